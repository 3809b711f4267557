//! The seam between the bridge and the platform broadcast mechanism.
//!
//! The transport is an external collaborator: it registers listener filters,
//! removes them again, and sends outbound broadcasts. All calls are synchronous.

use std::fmt;

use nav_protocol::Scalar;
use serde::Serialize;

use crate::error::TransportError;

/// Handle for one registered listener filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegistrationId(u64);

impl RegistrationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which broadcasts a listener is interested in.
///
/// A broadcast matches when its action is in `actions` and it either carries no
/// category or carries exactly this filter's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenerFilter {
    pub actions: Vec<String>,
    pub category: Option<String>,
    /// Delivery priority relative to other receivers; higher goes first
    pub priority: i32,
}

impl ListenerFilter {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            category: None,
            priority: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn matches(&self, broadcast: &OutboundBroadcast) -> bool {
        if !self.actions.iter().any(|a| *a == broadcast.action) {
            return false;
        }
        match &broadcast.category {
            None => true,
            Some(category) => self.category.as_deref() == Some(category.as_str()),
        }
    }
}

/// A value as written onto the outbound wire.
///
/// Mirrors the typed extras of a platform broadcast, which distinguish 32-bit
/// from 64-bit numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
}

impl From<&OutboundValue> for Scalar {
    fn from(value: &OutboundValue) -> Self {
        match value {
            OutboundValue::Int(v) => Scalar::Int(i64::from(*v)),
            OutboundValue::Long(v) => Scalar::Int(*v),
            OutboundValue::Float(v) => Scalar::Float(f64::from(*v)),
            OutboundValue::Double(v) => Scalar::Float(*v),
            OutboundValue::Bool(v) => Scalar::Bool(*v),
            OutboundValue::Str(v) => Scalar::Str(v.clone()),
        }
    }
}

/// One outbound broadcast: action, optional category and ordered extras
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundBroadcast {
    pub action: String,
    pub category: Option<String>,
    pub extras: Vec<(String, OutboundValue)>,
}

impl OutboundBroadcast {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            category: None,
            extras: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn put(&mut self, key: impl Into<String>, value: OutboundValue) {
        self.extras.push((key.into(), value));
    }

    pub fn extra(&self, key: &str) -> Option<&OutboundValue> {
        self.extras.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The broadcast as the receiving side would see it
    pub fn to_raw_event(&self) -> nav_protocol::RawEvent {
        nav_protocol::RawEvent {
            action: self.action.clone(),
            fields: self
                .extras
                .iter()
                .map(|(k, v)| (k.clone(), Some(Scalar::from(v))))
                .collect(),
        }
    }
}

/// Platform broadcast mechanism.
///
/// Implementations must be cheap to call and must not call back into the bridge
/// from inside these methods.
pub trait BroadcastTransport: Send + Sync {
    /// Register a listener filter, returning a handle for later removal
    fn register(&self, filter: &ListenerFilter) -> Result<RegistrationId, TransportError>;

    /// Remove a previously registered filter
    fn unregister(&self, id: RegistrationId) -> Result<(), TransportError>;

    /// Send one outbound broadcast
    fn dispatch(&self, broadcast: &OutboundBroadcast) -> Result<(), TransportError>;
}
