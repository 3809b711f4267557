//! Property-based tests for the bridge lifecycle and fan-out

use proptest::prelude::*;
use std::sync::Arc;

use nav_bridge::prelude::*;
use nav_bridge::{OutboundValue, WireKind, WELL_KNOWN_FIELDS};

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Stop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Start), Just(Op::Stop)]
}

/// A value for a well-known field that encodes without loss
fn native_value(kind: WireKind) -> BoxedStrategy<Scalar> {
    match kind {
        WireKind::Int => any::<i32>().prop_map(|v| Scalar::Int(v.into())).boxed(),
        WireKind::Long => any::<i64>().prop_map(Scalar::Int).boxed(),
        WireKind::Float | WireKind::Double => (-1.0e6f64..1.0e6).prop_map(Scalar::Float).boxed(),
        WireKind::Bool => any::<bool>().prop_map(Scalar::Bool).boxed(),
        WireKind::Str => "[a-z0-9 ]{0,12}".prop_map(Scalar::Str).boxed(),
    }
}

fn well_known_payload() -> impl Strategy<Value = Payload> {
    let per_field: Vec<_> = WELL_KNOWN_FIELDS
        .iter()
        .map(|f| proptest::option::of(native_value(f.kind)).prop_map(move |v| (f.name, v)))
        .collect();

    per_field.prop_map(|entries| {
        entries
            .into_iter()
            .filter_map(|(name, v)| v.map(|v| (name.to_string(), v)))
            .collect()
    })
}

fn matches_kind(kind: WireKind, value: &OutboundValue) -> bool {
    matches!(
        (kind, value),
        (WireKind::Int, OutboundValue::Int(_))
            | (WireKind::Long, OutboundValue::Long(_))
            | (WireKind::Float, OutboundValue::Float(_))
            | (WireKind::Double, OutboundValue::Double(_))
            | (WireKind::Bool, OutboundValue::Bool(_))
            | (WireKind::Str, OutboundValue::Str(_))
    )
}

// ============================================================================
// Lifecycle
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Active iff the last operation was a start; never more than one filter set
    #[test]
    fn prop_lifecycle_is_presence_guarded(ops in proptest::collection::vec(op_strategy(), 1..20)) {
        let (transport, _inbound) = LoopbackTransport::channel();
        let transport = Arc::new(transport);
        let bridge = Bridge::new(transport.clone());

        for op in &ops {
            match op {
                Op::Start => bridge.start().unwrap(),
                Op::Stop => {
                    bridge.stop();
                }
            }
            prop_assert!(transport.active_filters().len() <= 2);
        }

        let expect_active = matches!(ops.last(), Some(Op::Start));
        prop_assert_eq!(bridge.is_active(), expect_active);
        prop_assert_eq!(transport.active_filters().len(), if expect_active { 2 } else { 0 });
    }
}

// ============================================================================
// Fan-out
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Two broadcasts per action, every well-known field at its native type
    #[test]
    fn prop_fan_out_is_two_per_action_with_native_types(
        actions in proptest::collection::btree_set("[A-Z_]{1,16}", 1..5),
        payload in well_known_payload(),
    ) {
        let (transport, _inbound) = LoopbackTransport::channel();
        let transport = Arc::new(transport);
        let bridge = Bridge::new(transport.clone());

        let report = bridge.send(&actions, &payload);
        prop_assert_eq!(report.sent, actions.len() * 2);
        prop_assert!(report.skipped.is_empty());

        let dispatched = transport.dispatched();
        prop_assert_eq!(dispatched.len(), actions.len() * 2);

        for broadcast in &dispatched {
            prop_assert_eq!(broadcast.extras.len(), payload.len());
            for field in WELL_KNOWN_FIELDS {
                if payload.contains_key(field.name) {
                    let value = broadcast.extra(field.name);
                    prop_assert!(value.is_some_and(|v| matches_kind(field.kind, v)),
                        "{} encoded as {:?}", field.name, value);
                }
            }
        }
    }
}
