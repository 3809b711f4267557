//! Fallback adapter for actions the router does not recognize
//!
//! The event is still delivered, tagged `UnknownBroadcast`, with whatever fields
//! could be read.

use tracing::warn;

use super::{check_payload_size, extract_fields, finish, NormalizeContext, PassThrough};
use crate::event::{CanonicalEvent, Protocol, RawEvent};

pub(crate) fn normalize(raw: &RawEvent, ctx: &NormalizeContext) -> CanonicalEvent {
    warn!(action = %raw.action, fields = raw.len(), "Handling unknown broadcast");

    if raw.is_empty() {
        return CanonicalEvent::empty(
            Protocol::UnknownBroadcast,
            raw.action.as_str(),
            ctx.received_at,
            "payload empty",
        );
    }

    if let Err(e) = check_payload_size(raw, ctx) {
        warn!(action = %raw.action, error = %e, "Failed to parse unknown broadcast");
        return CanonicalEvent::empty(
            Protocol::UnknownBroadcast,
            raw.action.as_str(),
            ctx.received_at,
            e.to_string(),
        );
    }

    finish(
        Protocol::UnknownBroadcast,
        raw,
        ctx,
        extract_fields(raw, &PassThrough),
    )
}
