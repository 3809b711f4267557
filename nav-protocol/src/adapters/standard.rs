//! Standard broadcast adapter
//!
//! The standard broadcast carries `KEY_*`/`EXTRA_*` keys which are renamed to
//! their camelCase canonical names. Unlike the telemetry adapters, payload-level
//! failures are returned to the caller, which turns them into a fault message.

use tracing::debug;

use super::{check_payload_size, extract_fields, finish, FieldRules, NormalizeContext};
use crate::error::AdapterError;
use crate::event::{CanonicalEvent, Protocol, RawEvent};
use crate::scalar::{Scalar, ScalarKind};

/// Wire key → canonical name
pub const STANDARD_KEY_ALIASES: &[(&str, &str)] = &[
    ("KEY_TYPE", "keyType"),
    ("KEY_ACTION", "keyAction"),
    ("EXTRA_ROAD_NAME", "roadName"),
    ("EXTRA_NEXT_ROAD_NAME", "nextRoadName"),
    ("EXTRA_REMAIN_DISTANCE", "remainDistance"),
    ("EXTRA_REMAIN_TIME", "remainTime"),
    ("EXTRA_CUR_SPEED", "curSpeed"),
    ("EXTRA_LIMIT_SPEED", "limitSpeed"),
    ("EXTRA_SEGMENT_SPEED", "segmentSpeed"),
    ("EXTRA_CAMERA_SPEED", "cameraSpeed"),
];

struct StandardRules;

impl FieldRules for StandardRules {
    fn canonical_name<'a>(&self, key: &'a str) -> &'a str {
        STANDARD_KEY_ALIASES
            .iter()
            .find(|(wire, _)| *wire == key)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(key)
    }
}

/// `KEY_TYPE` selects the message kind; if it is there it has to be readable.
fn check_discriminator(raw: &RawEvent) -> Result<(), AdapterError> {
    if let Some(Some(value)) = raw.fields.get("KEY_TYPE") {
        if value.coerce(ScalarKind::Int).is_err() {
            return Err(AdapterError::InvalidDiscriminator {
                found: value.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn normalize(
    raw: &RawEvent,
    ctx: &NormalizeContext,
) -> Result<CanonicalEvent, AdapterError> {
    if raw.is_empty() {
        debug!(action = %raw.action, "Standard broadcast payload empty");
        return Ok(CanonicalEvent::empty(
            Protocol::StandardBroadcast,
            raw.action.as_str(),
            ctx.received_at,
            "payload empty",
        ));
    }

    check_payload_size(raw, ctx)?;
    check_discriminator(raw)?;

    let event = finish(
        Protocol::StandardBroadcast,
        raw,
        ctx,
        extract_fields(raw, &StandardRules),
    );
    debug!(
        action = %raw.action,
        key_type = ?event.field("keyType").and_then(Scalar::as_i64),
        fields = event.fields.len(),
        "Parsed standard broadcast"
    );
    Ok(event)
}
