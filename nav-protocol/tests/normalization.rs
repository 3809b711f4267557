//! End-to-end normalization scenarios across every protocol variant

use chrono::Utc;
use nav_protocol::{
    actions, normalize, AdapterError, NormalizeContext, Protocol, RawEvent, Scalar,
};
use rstest::rstest;

#[test]
fn test_navigation_scenario() {
    let before = Utc::now();
    let raw = RawEvent::new(actions::AMAP_AUTO_NAVI)
        .with_field("routeDistance", 1500)
        .with_field("nextTurn", "right");

    let event = normalize(&raw, &NormalizeContext::now()).unwrap();

    assert_eq!(event.protocol, Protocol::NavigationData);
    assert_eq!(event.field("routeDistance"), Some(&Scalar::Int(1500)));
    assert_eq!(event.field("nextTurn"), Some(&Scalar::Str("right".into())));
    assert!(event.parsed_successfully);
    assert!(event.timestamp >= before);
    assert!(event.timestamp <= Utc::now());
}

#[test]
fn test_source_timestamp_does_not_replace_normalization_time() {
    let raw = RawEvent::new(actions::AMAP_AUTO_NAVI_DATA)
        .with_field("timestamp", 1_i64)
        .with_field("route_time", 300);

    let event = normalize(&raw, &NormalizeContext::now()).unwrap();

    assert_eq!(event.field("timestamp"), Some(&Scalar::Int(1)));
    assert_ne!(event.timestamp_millis(), 1);
    assert_eq!(event.to_map()["timestamp"], serde_json::json!(event.timestamp_millis()));
}

#[test]
fn test_unknown_empty_scenario() {
    let raw = RawEvent::new("unregistered-action-xyz");
    let event = normalize(&raw, &NormalizeContext::now()).unwrap();

    assert_eq!(event.protocol, Protocol::UnknownBroadcast);
    assert!(!event.parsed_successfully);
}

#[rstest]
#[case(actions::AMAP_AUTO_NAVI, Protocol::NavigationData)]
#[case(actions::AMAP_AUTO_LOCATION, Protocol::LocationData)]
#[case(actions::AUTONAVI_STANDARD_BROADCAST_SEND, Protocol::StandardBroadcast)]
#[case("COM_EXAMPLE_OTHER", Protocol::UnknownBroadcast)]
fn test_bad_field_does_not_suppress_good_fields(
    #[case] action: &str,
    #[case] protocol: Protocol,
) {
    let raw = RawEvent::new(action)
        .with_field("route_distance", "a long way")
        .with_field("next_road", "中山路");

    let event = normalize(&raw, &NormalizeContext::now()).unwrap();

    assert_eq!(event.protocol, protocol);
    assert!(event.parsed_successfully);
    assert_eq!(event.field("next_road"), Some(&Scalar::Str("中山路".into())));
    assert!(event.field("route_distance").is_none());
    assert_eq!(event.diagnostics.len(), 1);
    assert_eq!(event.diagnostics[0].reason, "expected integer, found string");
}

#[test]
fn test_only_standard_raises_payload_errors() {
    let ctx = NormalizeContext::now().with_max_fields(1);
    let oversized = |action: &str| {
        RawEvent::new(action)
            .with_field("a", 1)
            .with_field("b", 2)
    };

    for action in [
        actions::AMAP_AUTO_NAVI,
        actions::AMAP_AUTO_LOCATION,
        "SOMETHING_ELSE",
    ] {
        let event = normalize(&oversized(action), &ctx).unwrap();
        assert!(!event.parsed_successfully, "{}", action);
        assert!(event.parse_error.is_some(), "{}", action);
    }

    let err = normalize(&oversized(actions::AUTONAVI_STANDARD_BROADCAST_SEND), &ctx).unwrap_err();
    assert!(matches!(err, AdapterError::TooManyFields { .. }));
}
