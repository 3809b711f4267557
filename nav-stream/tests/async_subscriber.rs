//! Delivery into async subscribers

use std::sync::Arc;

use nav_protocol::{actions, Protocol, RawEvent, Scalar};
use nav_stream::{
    BridgeMessage, BroadcastTransport, EventProcessor, ListenerFilter, LoopbackTransport,
    OutboundBroadcast, OutboundValue, SubscriptionSlot,
};

#[tokio::test]
async fn test_unbounded_sender_receives_events() {
    let slot = Arc::new(SubscriptionSlot::new());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BridgeMessage>();
    slot.attach(tx);

    let processor = EventProcessor::new(Arc::clone(&slot));
    processor.process(
        &RawEvent::new(actions::AMAP_AUTO_LOCATION)
            .with_field("latitude", 39.9042)
            .with_field("longitude", 116.4074)
            .with_field("provider", "gps"),
    );

    let message = rx.recv().await.unwrap();
    let event = message.as_event().unwrap();
    assert_eq!(event.protocol, Protocol::LocationData);
    assert_eq!(event.field("provider"), Some(&Scalar::Str("gps".into())));
}

#[tokio::test]
async fn test_dropped_async_receiver_detaches() {
    let slot = SubscriptionSlot::new();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<BridgeMessage>();
    slot.attach(tx);
    drop(rx);

    let processor = EventProcessor::new(Arc::new(slot));
    processor.process(&RawEvent::new(actions::AMAP_AUTO_NAVI).with_field("next_turn", "left"));
    assert!(!processor.slot().has_subscriber());
    assert!(processor.slot().last_event().is_some());
}

#[test]
fn test_loopback_roundtrip_through_processor() {
    let (transport, inbound) = LoopbackTransport::channel();
    transport
        .register(&ListenerFilter::new([actions::AMAP_AUTO_NAVI_DATA]).with_priority(1000))
        .unwrap();

    let slot = Arc::new(SubscriptionSlot::new());
    let events = slot.subscribe();
    let processor = EventProcessor::new(slot);

    let mut broadcast = OutboundBroadcast::new(actions::AMAP_AUTO_NAVI_DATA);
    broadcast.put("route_distance", OutboundValue::Int(1500));
    broadcast.put("current_speed", OutboundValue::Double(60.0));
    broadcast.put("next_road", OutboundValue::Str("中山路".into()));
    transport.dispatch(&broadcast).unwrap();

    for raw in inbound.try_iter() {
        processor.process(&raw);
    }

    let event = events.try_recv().and_then(BridgeMessage::into_event).unwrap();
    assert_eq!(event.protocol, Protocol::NavigationData);
    assert_eq!(event.field("route_distance"), Some(&Scalar::Int(1500)));
    assert_eq!(event.field("current_speed"), Some(&Scalar::Float(60.0)));
    assert_eq!(event.field("next_road"), Some(&Scalar::Str("中山路".into())));
    assert!(event.parsed_successfully);
}
