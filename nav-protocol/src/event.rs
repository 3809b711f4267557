//! Raw and canonical event types

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::STANDARD_KEY_ALIASES;
use crate::scalar::Scalar;

/// Key/value payload with every value present, as used for outbound emission
pub type Payload = BTreeMap<String, Scalar>;

/// An inbound broadcast exactly as the transport handed it over.
///
/// Field values may be absent when the sender put a null extra. An empty field
/// map is treated as an absent payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    pub action: String,
    pub fields: BTreeMap<String, Option<Scalar>>,
}

impl RawEvent {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.fields.insert(name.into(), Some(value.into()));
        self
    }

    pub fn with_absent(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), None);
        self
    }

    /// Build a raw event from a fully-present payload
    pub fn from_payload(action: impl Into<String>, payload: &Payload) -> Self {
        Self {
            action: action.into(),
            fields: payload
                .iter()
                .map(|(k, v)| (k.clone(), Some(v.clone())))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Protocol family an event was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    NavigationData,
    LocationData,
    StandardBroadcast,
    UnknownBroadcast,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::NavigationData => "navigation_data",
            Protocol::LocationData => "location_data",
            Protocol::StandardBroadcast => "standard_broadcast",
            Protocol::UnknownBroadcast => "unknown_broadcast",
        }
    }

    /// Method name the host's UI channel expects for events of this protocol
    pub fn method_name(&self) -> &'static str {
        match self {
            Protocol::NavigationData => "onNavigationData",
            Protocol::LocationData => "onLocationData",
            Protocol::StandardBroadcast => "onStandardBroadcast",
            Protocol::UnknownBroadcast => "onUnknownBroadcast",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that was skipped during normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiagnostic {
    pub field: String,
    pub reason: String,
}

/// The normalized event every protocol variant converges to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalEvent {
    pub protocol: Protocol,
    /// Action identifier the event arrived under
    pub action: String,
    pub fields: BTreeMap<String, Scalar>,
    /// Normalization time, never taken from the source
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub parsed_successfully: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl CanonicalEvent {
    /// An event with no fields and `parsed_successfully = false`
    pub fn empty(
        protocol: Protocol,
        action: impl Into<String>,
        timestamp: DateTime<Utc>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            protocol,
            action: action.into(),
            fields: BTreeMap::new(),
            timestamp,
            parsed_successfully: false,
            parse_error: Some(reason.into()),
            diagnostics: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Scalar> {
        self.fields.get(name)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// The event's fields as a payload suitable for re-emission.
    ///
    /// Standard broadcast fields go back under their wire keys so the emitter
    /// writes them at their native type.
    pub fn to_payload(&self) -> Payload {
        if self.protocol != Protocol::StandardBroadcast {
            return self.fields.clone();
        }

        self.fields
            .iter()
            .map(|(name, value)| {
                let key = STANDARD_KEY_ALIASES
                    .iter()
                    .find(|(_, canonical)| *canonical == name.as_str())
                    .map_or(name.as_str(), |(wire, _)| *wire);
                (key.to_string(), value.clone())
            })
            .collect()
    }

    /// Flatten into the key/value map shape the UI layer consumes.
    ///
    /// Bookkeeping keys are written after the fields and win on collision.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        use serde_json::Value;

        let mut map: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v)))
            .collect();

        map.insert("timestamp".into(), Value::from(self.timestamp_millis()));
        map.insert("action".into(), Value::String(self.action.clone()));
        map.insert("protocol".into(), Value::String(self.protocol.as_str().into()));
        map.insert(
            "parsed_successfully".into(),
            Value::Bool(self.parsed_successfully),
        );
        if self.protocol == Protocol::UnknownBroadcast {
            map.insert("type".into(), Value::String("unknown_broadcast".into()));
        }
        if let Some(error) = &self.parse_error {
            map.insert("parse_error".into(), Value::String(error.clone()));
        }

        map
    }
}
