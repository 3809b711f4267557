//! Outbound fan-out emitter
//!
//! Re-emits a payload under one or more action names so listeners built against
//! any of the historical conventions receive it. Every action is sent twice,
//! once with the compatibility category and once without, because firmware
//! builds disagree about whether the category is required.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use nav_protocol::{
    well_known, FieldDiagnostic, Payload, Scalar, SkipReason, WireKind, WELL_KNOWN_FIELDS,
};
use nav_stream::{BroadcastTransport, OutboundBroadcast, OutboundValue};

/// Result of one `emit` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmitReport {
    /// Broadcasts the transport accepted
    pub sent: usize,
    /// Broadcasts the transport refused
    pub failed: usize,
    /// Payload fields left out of every broadcast
    pub skipped: Vec<FieldDiagnostic>,
}

impl EmitReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.skipped.is_empty()
    }
}

/// Sends payloads to every action in a family through the transport
pub struct FanoutEmitter {
    transport: Arc<dyn BroadcastTransport>,
    category: String,
}

impl FanoutEmitter {
    pub fn new(transport: Arc<dyn BroadcastTransport>, category: impl Into<String>) -> Self {
        Self {
            transport,
            category: category.into(),
        }
    }

    /// Emit `payload` to every action in `actions`.
    ///
    /// Transport failures are logged and counted; they never stop the remaining
    /// sends.
    pub fn emit<I, S>(&self, actions: I, payload: &Payload) -> EmitReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (extras, skipped) = encode_payload(payload);
        let mut report = EmitReport {
            skipped,
            ..Default::default()
        };

        for action in actions {
            let action = action.as_ref();
            let plain = OutboundBroadcast {
                action: action.to_string(),
                category: None,
                extras: extras.clone(),
            };
            let categorized = plain.clone().with_category(self.category.clone());

            for broadcast in [categorized, plain] {
                match self.transport.dispatch(&broadcast) {
                    Ok(()) => report.sent += 1,
                    Err(e) => {
                        warn!(
                            action = %broadcast.action,
                            category = ?broadcast.category,
                            error = %e,
                            "Failed to dispatch broadcast"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        debug!(
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped.len(),
            "Fan-out complete"
        );
        report
    }
}

impl std::fmt::Debug for FanoutEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutEmitter")
            .field("category", &self.category)
            .finish()
    }
}

/// Encode a payload into ordered wire extras.
///
/// Well-known keys come first, in table order, at their native type. The rest
/// follow sorted by name.
pub fn encode_payload(payload: &Payload) -> (Vec<(String, OutboundValue)>, Vec<FieldDiagnostic>) {
    let mut extras = Vec::with_capacity(payload.len());
    let mut skipped = Vec::new();

    let mut push = |key: &str, result: Result<OutboundValue, SkipReason>| match result {
        Ok(value) => extras.push((key.to_string(), value)),
        Err(reason) => {
            warn!(field = %key, reason = %reason, "Skipping field on emit");
            skipped.push(FieldDiagnostic {
                field: key.to_string(),
                reason: reason.to_string(),
            });
        }
    };

    for field in WELL_KNOWN_FIELDS {
        if let Some(value) = payload.get(field.name) {
            push(field.name, encode_native(field.kind, value));
        }
    }

    for (key, value) in payload {
        if well_known(key).is_none() {
            push(key, encode_extra(value));
        }
    }

    (extras, skipped)
}

fn encode_native(kind: WireKind, value: &Scalar) -> Result<OutboundValue, SkipReason> {
    if !value.is_representable() {
        return Err(SkipReason::NonFinite);
    }

    let coerced = value.coerce(kind.scalar_kind())?;
    Ok(match (kind, coerced) {
        (WireKind::Int, Scalar::Int(v)) => OutboundValue::Int(narrow_int(v)?),
        (WireKind::Long, Scalar::Int(v)) => OutboundValue::Long(v),
        (WireKind::Float, Scalar::Float(v)) => OutboundValue::Float(v as f32),
        (WireKind::Double, Scalar::Float(v)) => OutboundValue::Double(v),
        (_, Scalar::Bool(v)) => OutboundValue::Bool(v),
        (_, Scalar::Str(v)) => OutboundValue::Str(v),
        (_, other) => {
            return Err(SkipReason::Mismatch {
                expected: kind.scalar_kind(),
                found: other.kind(),
            })
        }
    })
}

fn encode_extra(value: &Scalar) -> Result<OutboundValue, SkipReason> {
    match value {
        Scalar::Str(v) => Ok(OutboundValue::Str(v.clone())),
        Scalar::Bool(v) => Ok(OutboundValue::Bool(*v)),
        Scalar::Int(v) => Ok(i32::try_from(*v)
            .map(OutboundValue::Int)
            .unwrap_or(OutboundValue::Long(*v))),
        Scalar::Float(v) if !v.is_finite() => Err(SkipReason::NonFinite),
        // values beyond f32 range would become infinite, keep them wide
        Scalar::Float(v) if v.abs() > f64::from(f32::MAX) => Ok(OutboundValue::Double(*v)),
        Scalar::Float(v) => Ok(OutboundValue::Float(*v as f32)),
    }
}

fn narrow_int(v: i64) -> Result<i32, SkipReason> {
    i32::try_from(v).map_err(|_| SkipReason::OutOfRange {
        value: v as f64,
        min: f64::from(i32::MIN),
        max: f64::from(i32::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn payload(entries: &[(&str, Scalar)]) -> Payload {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_well_known_first_in_table_order() {
        let payload = payload(&[
            ("zeta", Scalar::Str("z".into())),
            ("next_turn", Scalar::Str("right".into())),
            ("alpha", Scalar::Int(1)),
            ("route_distance", Scalar::Int(1500)),
            ("timestamp", Scalar::Int(1_700_000_000_000)),
        ]);

        let (extras, skipped) = encode_payload(&payload);
        let keys: Vec<_> = extras.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["timestamp", "route_distance", "next_turn", "alpha", "zeta"]
        );
        assert!(skipped.is_empty());
    }

    #[rstest]
    #[case(WireKind::Int, Scalar::Int(1500), OutboundValue::Int(1500))]
    #[case(WireKind::Long, Scalar::Int(1_700_000_000_000), OutboundValue::Long(1_700_000_000_000))]
    #[case(WireKind::Double, Scalar::Float(60.0), OutboundValue::Double(60.0))]
    #[case(WireKind::Double, Scalar::Int(60), OutboundValue::Double(60.0))]
    #[case(WireKind::Int, Scalar::Str("300".into()), OutboundValue::Int(300))]
    #[case(WireKind::Str, Scalar::Str("gps".into()), OutboundValue::Str("gps".into()))]
    fn test_encode_native(
        #[case] kind: WireKind,
        #[case] value: Scalar,
        #[case] expected: OutboundValue,
    ) {
        assert_eq!(encode_native(kind, &value), Ok(expected));
    }

    #[test]
    fn test_encode_native_rejects() {
        assert!(matches!(
            encode_native(WireKind::Int, &Scalar::Int(i64::from(i32::MAX) + 1)),
            Err(SkipReason::OutOfRange { .. })
        ));
        assert!(matches!(
            encode_native(WireKind::Int, &Scalar::Str("far".into())),
            Err(SkipReason::Mismatch { .. })
        ));
        assert_eq!(
            encode_native(WireKind::Double, &Scalar::Float(f64::NAN)),
            Err(SkipReason::NonFinite)
        );
    }

    #[rstest]
    #[case(Scalar::Int(42), OutboundValue::Int(42))]
    #[case(Scalar::Int(5_000_000_000), OutboundValue::Long(5_000_000_000))]
    #[case(Scalar::Bool(true), OutboundValue::Bool(true))]
    #[case(Scalar::Float(0.5), OutboundValue::Float(0.5))]
    #[case(Scalar::Float(1e300), OutboundValue::Double(1e300))]
    #[case(Scalar::Str("天安门广场".into()), OutboundValue::Str("天安门广场".into()))]
    fn test_encode_extra(#[case] value: Scalar, #[case] expected: OutboundValue) {
        assert_eq!(encode_extra(&value), Ok(expected));
    }

    #[test]
    fn test_encode_extra_skips_non_finite() {
        let payload = payload(&[
            ("good", Scalar::Int(1)),
            ("bad", Scalar::Float(f64::INFINITY)),
        ]);
        let (extras, skipped) = encode_payload(&payload);
        assert_eq!(extras, vec![("good".to_string(), OutboundValue::Int(1))]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].field, "bad");
    }
}
