//! Location update adapter
//!
//! Same tolerant extraction as navigation, with coordinate range checks: a
//! latitude or longitude that cannot be a position on earth is dropped.

use tracing::{debug, warn};

use super::{check_payload_size, extract_fields, finish, FieldRules, NormalizeContext};
use crate::error::SkipReason;
use crate::event::{CanonicalEvent, Protocol, RawEvent};
use crate::scalar::Scalar;

struct LocationRules;

impl FieldRules for LocationRules {
    fn validate(&self, key: &str, value: &Scalar) -> Result<(), SkipReason> {
        let (min, max) = match key {
            "latitude" => (-90.0, 90.0),
            "longitude" => (-180.0, 180.0),
            "bearing" => (0.0, 360.0),
            _ => return Ok(()),
        };

        match value.as_f64() {
            Some(v) if v < min || v > max => Err(SkipReason::OutOfRange { value: v, min, max }),
            _ => Ok(()),
        }
    }
}

pub(crate) fn normalize(raw: &RawEvent, ctx: &NormalizeContext) -> CanonicalEvent {
    if raw.is_empty() {
        debug!(action = %raw.action, "Location payload empty");
        return CanonicalEvent::empty(
            Protocol::LocationData,
            raw.action.as_str(),
            ctx.received_at,
            "payload empty",
        );
    }

    if let Err(e) = check_payload_size(raw, ctx) {
        warn!(action = %raw.action, error = %e, "Rejecting location payload");
        return CanonicalEvent::empty(
            Protocol::LocationData,
            raw.action.as_str(),
            ctx.received_at,
            format!("failed to parse location data: {}", e),
        );
    }

    let event = finish(
        Protocol::LocationData,
        raw,
        ctx,
        extract_fields(raw, &LocationRules),
    );
    debug!(
        action = %raw.action,
        fields = event.fields.len(),
        skipped = event.diagnostics.len(),
        "Parsed location data"
    );
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions;

    fn sample() -> RawEvent {
        RawEvent::new(actions::AMAP_AUTO_LOCATION)
            .with_field("latitude", 39.9042)
            .with_field("longitude", 116.4074)
            .with_field("speed", 60.0)
            .with_field("bearing", 90.0)
            .with_field("accuracy", 10.0)
            .with_field("provider", "gps")
    }

    #[test]
    fn test_parse_location_fields() {
        let event = normalize(&sample(), &NormalizeContext::now());

        assert_eq!(event.protocol, Protocol::LocationData);
        assert!(event.parsed_successfully);
        assert_eq!(event.fields.len(), 6);
        assert_eq!(event.field("latitude"), Some(&Scalar::Float(39.9042)));
        assert_eq!(event.field("provider"), Some(&Scalar::Str("gps".into())));
    }

    #[test]
    fn test_out_of_range_coordinate_is_skipped() {
        let raw = sample().with_field("latitude", 123.0);
        let event = normalize(&raw, &NormalizeContext::now());

        assert!(event.parsed_successfully);
        assert!(event.field("latitude").is_none());
        assert_eq!(event.diagnostics.len(), 1);
        assert_eq!(event.diagnostics[0].field, "latitude");
        assert_eq!(event.diagnostics[0].reason, "123 outside -90..=90");
    }

    #[test]
    fn test_string_coordinates_are_coerced() {
        let raw = RawEvent::new(actions::AMAP_AUTO_LOCATION).with_field("longitude", "116.5");
        let event = normalize(&raw, &NormalizeContext::now());
        assert_eq!(event.field("longitude"), Some(&Scalar::Float(116.5)));
    }

    #[test]
    fn test_empty_payload() {
        let event = normalize(
            &RawEvent::new(actions::AMAP_AUTO_LOCATION),
            &NormalizeContext::now(),
        );
        assert!(!event.parsed_successfully);
        assert_eq!(event.parse_error.as_deref(), Some("payload empty"));
    }
}
