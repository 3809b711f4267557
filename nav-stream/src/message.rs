//! Messages delivered to the subscriber

use chrono::{DateTime, Utc};
use nav_protocol::CanonicalEvent;
use serde::Serialize;

/// A whole-event failure: the pipeline could not produce a canonical event.
///
/// Distinct from a malformed payload, which still arrives as a low-confidence
/// [`CanonicalEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeFault {
    /// Action identifier of the broadcast that failed
    pub action: String,
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl BridgeFault {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// What a subscriber receives
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum BridgeMessage {
    Event(CanonicalEvent),
    Fault(BridgeFault),
}

impl BridgeMessage {
    /// Method name on the host's UI channel
    pub fn method_name(&self) -> &'static str {
        match self {
            BridgeMessage::Event(event) => event.protocol.method_name(),
            BridgeMessage::Fault(_) => "onError",
        }
    }

    pub fn as_event(&self) -> Option<&CanonicalEvent> {
        match self {
            BridgeMessage::Event(event) => Some(event),
            BridgeMessage::Fault(_) => None,
        }
    }

    pub fn as_fault(&self) -> Option<&BridgeFault> {
        match self {
            BridgeMessage::Fault(fault) => Some(fault),
            BridgeMessage::Event(_) => None,
        }
    }

    pub fn into_event(self) -> Option<CanonicalEvent> {
        match self {
            BridgeMessage::Event(event) => Some(event),
            BridgeMessage::Fault(_) => None,
        }
    }

    /// Flat key/value map for the UI channel
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match self {
            BridgeMessage::Event(event) => event.to_map(),
            BridgeMessage::Fault(fault) => {
                let mut map = serde_json::Map::new();
                map.insert("error".into(), fault.message.clone().into());
                map.insert("action".into(), fault.action.clone().into());
                map.insert("timestamp".into(), fault.timestamp.timestamp_millis().into());
                map
            }
        }
    }
}

impl From<CanonicalEvent> for BridgeMessage {
    fn from(event: CanonicalEvent) -> Self {
        BridgeMessage::Event(event)
    }
}

impl From<BridgeFault> for BridgeMessage {
    fn from(fault: BridgeFault) -> Self {
        BridgeMessage::Fault(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_protocol::Protocol;

    #[test]
    fn test_method_names() {
        let event = CanonicalEvent::empty(
            Protocol::LocationData,
            "AMAP_AUTO_LOCATION",
            Utc::now(),
            "payload empty",
        );
        assert_eq!(BridgeMessage::from(event).method_name(), "onLocationData");

        let fault = BridgeFault::new("AUTONAVI_STANDARD_BROADCAST_SEND", "boom");
        assert_eq!(BridgeMessage::from(fault).method_name(), "onError");
    }

    #[test]
    fn test_fault_map() {
        let fault = BridgeFault::new("AUTONAVI_STANDARD_BROADCAST_SEND", "bad KEY_TYPE");
        let map = BridgeMessage::from(fault).to_map();
        assert_eq!(map["error"], serde_json::json!("bad KEY_TYPE"));
        assert_eq!(
            map["action"],
            serde_json::json!("AUTONAVI_STANDARD_BROADCAST_SEND")
        );
        assert!(map["timestamp"].is_i64());
    }

    #[test]
    fn test_serialize_tagged() {
        let fault = BridgeFault::new("X", "y");
        let json = serde_json::to_value(BridgeMessage::from(fault)).unwrap();
        assert_eq!(json["kind"], serde_json::json!("fault"));
        assert_eq!(json["payload"]["action"], serde_json::json!("X"));
    }
}
