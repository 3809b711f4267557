//! Protocol adapters
//!
//! Each adapter turns a [`RawEvent`] of one wire variant into a
//! [`CanonicalEvent`]. Field extraction is shared: every field is handled on its
//! own and a failure only drops that field.

mod location;
mod navigation;
mod standard;
mod unknown;

pub use standard::STANDARD_KEY_ALIASES;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{AdapterError, SkipReason};
use crate::event::{CanonicalEvent, FieldDiagnostic, Protocol, RawEvent};
use crate::fields::{is_metadata, well_known};
use crate::scalar::Scalar;

/// Default upper bound on extras per event
pub const DEFAULT_MAX_FIELDS: usize = 256;

/// Inputs an adapter needs besides the raw event itself
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext {
    /// Timestamp stamped onto the resulting event
    pub received_at: DateTime<Utc>,
    pub max_fields: usize,
}

impl NormalizeContext {
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(received_at: DateTime<Utc>) -> Self {
        Self {
            received_at,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }

    pub fn with_max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields;
        self
    }
}

impl Default for NormalizeContext {
    fn default() -> Self {
        Self::now()
    }
}

/// The adapter responsible for one protocol variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adapter {
    Navigation,
    Location,
    Standard,
    Unknown,
}

impl Adapter {
    pub fn protocol(self) -> Protocol {
        match self {
            Adapter::Navigation => Protocol::NavigationData,
            Adapter::Location => Protocol::LocationData,
            Adapter::Standard => Protocol::StandardBroadcast,
            Adapter::Unknown => Protocol::UnknownBroadcast,
        }
    }

    /// Normalize `raw` with this adapter.
    ///
    /// Only [`Adapter::Standard`] can return an error; the others always produce an
    /// event, flagging failures on it instead.
    pub fn normalize(
        self,
        raw: &RawEvent,
        ctx: &NormalizeContext,
    ) -> Result<CanonicalEvent, AdapterError> {
        match self {
            Adapter::Navigation => Ok(navigation::normalize(raw, ctx)),
            Adapter::Location => Ok(location::normalize(raw, ctx)),
            Adapter::Standard => standard::normalize(raw, ctx),
            Adapter::Unknown => Ok(unknown::normalize(raw, ctx)),
        }
    }
}

/// Fields pulled out of a raw payload, plus what was skipped
#[derive(Debug, Default)]
pub(crate) struct Extraction {
    pub fields: BTreeMap<String, Scalar>,
    pub diagnostics: Vec<FieldDiagnostic>,
    /// Extracted fields that are not metadata
    pub meaningful: usize,
}

/// Per-field hooks an adapter can plug into the shared extraction loop
pub(crate) trait FieldRules {
    /// Canonical name for a wire key
    fn canonical_name<'a>(&self, key: &'a str) -> &'a str {
        key
    }

    /// Extra validation after type coercion
    fn validate(&self, _key: &str, _value: &Scalar) -> Result<(), SkipReason> {
        Ok(())
    }
}

/// Pass-through rules: wire names kept, no extra validation
pub(crate) struct PassThrough;

impl FieldRules for PassThrough {}

pub(crate) fn check_payload_size(raw: &RawEvent, ctx: &NormalizeContext) -> Result<(), AdapterError> {
    if raw.len() > ctx.max_fields {
        return Err(AdapterError::TooManyFields {
            count: raw.len(),
            limit: ctx.max_fields,
        });
    }
    Ok(())
}

/// Coerce a single field to its canonical form
pub(crate) fn extract_field(
    key: &str,
    value: Option<&Scalar>,
    rules: &impl FieldRules,
) -> Result<Scalar, SkipReason> {
    if key.is_empty() {
        return Err(SkipReason::EmptyName);
    }
    let value = value.ok_or(SkipReason::Absent)?;
    if !value.is_representable() {
        return Err(SkipReason::NonFinite);
    }

    let value = match well_known(key) {
        Some(field) => value.coerce(field.kind.scalar_kind())?,
        None => value.clone(),
    };
    rules.validate(key, &value)?;

    Ok(value)
}

/// Run every raw field through [`extract_field`], isolating failures.
///
/// Every raw key ends up either in `fields` or in `diagnostics`. When two keys
/// map to the same canonical name, the first in key order wins.
pub(crate) fn extract_fields(raw: &RawEvent, rules: &impl FieldRules) -> Extraction {
    let mut extraction = Extraction::default();

    for (key, value) in &raw.fields {
        let name = rules.canonical_name(key);
        let result = if extraction.fields.contains_key(name) {
            Err(SkipReason::Duplicate {
                canonical: name.to_string(),
            })
        } else {
            extract_field(key, value.as_ref(), rules)
        };

        match result {
            Ok(scalar) => {
                if !is_metadata(name) {
                    extraction.meaningful += 1;
                }
                extraction.fields.insert(name.to_string(), scalar);
            }
            Err(reason) => {
                warn!(
                    action = %raw.action,
                    field = %key,
                    reason = %reason,
                    "Skipping field that failed coercion"
                );
                extraction.diagnostics.push(FieldDiagnostic {
                    field: key.clone(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    extraction
}

/// Assemble the canonical event from an extraction
pub(crate) fn finish(
    protocol: Protocol,
    raw: &RawEvent,
    ctx: &NormalizeContext,
    extraction: Extraction,
) -> CanonicalEvent {
    let parsed_successfully = extraction.meaningful > 0;

    let parse_error = if !parsed_successfully {
        if extraction.fields.is_empty() {
            Some("all fields failed coercion".to_string())
        } else {
            Some("no meaningful fields".to_string())
        }
    } else if !extraction.diagnostics.is_empty() {
        Some(format!(
            "{} of {} fields skipped",
            extraction.diagnostics.len(),
            raw.len()
        ))
    } else {
        None
    };

    CanonicalEvent {
        protocol,
        action: raw.action.clone(),
        fields: extraction.fields,
        timestamp: ctx.received_at,
        parsed_successfully,
        parse_error,
        diagnostics: extraction.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field_rules() {
        assert_eq!(
            extract_field("", Some(&Scalar::Int(1)), &PassThrough),
            Err(SkipReason::EmptyName)
        );
        assert_eq!(
            extract_field("next_turn", None, &PassThrough),
            Err(SkipReason::Absent)
        );
        assert_eq!(
            extract_field("custom", Some(&Scalar::Float(f64::NAN)), &PassThrough),
            Err(SkipReason::NonFinite)
        );
        // well-known fields are coerced
        assert_eq!(
            extract_field("route_distance", Some(&Scalar::Str("1500".into())), &PassThrough),
            Ok(Scalar::Int(1500))
        );
        // unknown fields pass through untouched
        assert_eq!(
            extract_field("routeDistance", Some(&Scalar::Str("far".into())), &PassThrough),
            Ok(Scalar::Str("far".into()))
        );
    }

    #[test]
    fn test_metadata_does_not_count_as_meaningful() {
        let raw = RawEvent::new("AMAP_AUTO_NAVI")
            .with_field("action", "navigation")
            .with_field("timestamp", 1_700_000_000_000_i64);

        let extraction = extract_fields(&raw, &PassThrough);
        assert_eq!(extraction.fields.len(), 2);
        assert_eq!(extraction.meaningful, 0);

        let event = finish(
            Protocol::NavigationData,
            &raw,
            &NormalizeContext::now(),
            extraction,
        );
        assert!(!event.parsed_successfully);
        assert_eq!(event.parse_error.as_deref(), Some("no meaningful fields"));
    }

    #[test]
    fn test_partial_failure_summary() {
        let raw = RawEvent::new("AMAP_AUTO_NAVI")
            .with_field("route_distance", "far")
            .with_field("next_turn", "right");

        let event = finish(
            Protocol::NavigationData,
            &raw,
            &NormalizeContext::now(),
            extract_fields(&raw, &PassThrough),
        );
        assert!(event.parsed_successfully);
        assert_eq!(event.parse_error.as_deref(), Some("1 of 2 fields skipped"));
        assert_eq!(event.diagnostics.len(), 1);
        assert_eq!(event.diagnostics[0].field, "route_distance");
    }

    #[test]
    fn test_colliding_canonical_names_are_diagnosed() {
        struct Upper;
        impl FieldRules for Upper {
            fn canonical_name<'a>(&self, key: &'a str) -> &'a str {
                if key == "NEXT_TURN" {
                    "next_turn"
                } else {
                    key
                }
            }
        }

        let raw = RawEvent::new("AMAP_AUTO_NAVI")
            .with_field("NEXT_TURN", "left")
            .with_field("next_turn", "right");

        let extraction = extract_fields(&raw, &Upper);
        assert_eq!(
            extraction.fields.get("next_turn"),
            Some(&Scalar::Str("left".into()))
        );
        assert_eq!(extraction.meaningful, 1);
        assert_eq!(extraction.diagnostics.len(), 1);
        assert_eq!(extraction.diagnostics[0].field, "next_turn");
        assert_eq!(
            extraction.diagnostics[0].reason,
            "duplicate of canonical field next_turn"
        );
    }

    #[test]
    fn test_payload_size_limit() {
        let raw = RawEvent::new("AMAP_AUTO_NAVI")
            .with_field("a", 1)
            .with_field("b", 2)
            .with_field("c", 3);
        let ctx = NormalizeContext::now().with_max_fields(2);

        assert_eq!(
            check_payload_size(&raw, &ctx),
            Err(AdapterError::TooManyFields { count: 3, limit: 2 })
        );
        assert!(check_payload_size(&raw, &NormalizeContext::now()).is_ok());
    }
}
