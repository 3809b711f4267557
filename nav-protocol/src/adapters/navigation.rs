//! Navigation telemetry adapter
//!
//! Handles the generic navigation actions and their vendor aliases. Keys are kept
//! as the sender wrote them. Never fails: payload-level problems come back as a
//! failure-flagged event.

use tracing::{debug, warn};

use super::{check_payload_size, extract_fields, finish, NormalizeContext, PassThrough};
use crate::event::{CanonicalEvent, Protocol, RawEvent};

pub(crate) fn normalize(raw: &RawEvent, ctx: &NormalizeContext) -> CanonicalEvent {
    if raw.is_empty() {
        warn!(action = %raw.action, "Navigation payload empty");
        return CanonicalEvent::empty(
            Protocol::NavigationData,
            raw.action.as_str(),
            ctx.received_at,
            "payload empty",
        );
    }

    if let Err(e) = check_payload_size(raw, ctx) {
        warn!(action = %raw.action, error = %e, "Rejecting navigation payload");
        return CanonicalEvent::empty(
            Protocol::NavigationData,
            raw.action.as_str(),
            ctx.received_at,
            format!("failed to parse navigation data: {}", e),
        );
    }

    let event = finish(
        Protocol::NavigationData,
        raw,
        ctx,
        extract_fields(raw, &PassThrough),
    );
    debug!(
        action = %raw.action,
        fields = event.fields.len(),
        skipped = event.diagnostics.len(),
        "Parsed navigation data"
    );
    event
}
