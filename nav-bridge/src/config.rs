//! Configuration for the bridge
//!
//! Controls which actions are listened for, how listeners are registered and how
//! much an inbound payload may carry. Every field has a default, so a partial
//! JSON document is a valid configuration.

use serde::{Deserialize, Serialize};

use nav_protocol::actions::{
    AUTONAVI_STANDARD_BROADCAST_SEND, AUTONAVI_STANDARD_CATEGORY, RECOGNIZED_ACTIONS,
};
use nav_protocol::DEFAULT_MAX_FIELDS;

use crate::error::{BridgeError, Result};

/// Configuration for a [`crate::Bridge`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Actions the listener filters cover
    /// Default: all six recognized actions
    pub actions: Vec<String>,

    /// Category qualifier for the categorized listener and emission variant
    /// Default: `AUTONAVI_STANDARD_CATEGORY`
    pub category: String,

    /// Priority of registered listeners
    /// Default: 1000
    pub listener_priority: i32,

    /// Upper bound on extras per inbound event
    /// Default: 256
    pub max_fields: usize,

    /// Replay the last event to a newly attached subscriber
    /// Default: true
    pub replay_on_attach: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            actions: RECOGNIZED_ACTIONS.iter().map(|a| a.to_string()).collect(),
            category: AUTONAVI_STANDARD_CATEGORY.to_string(),
            listener_priority: 1000,
            max_fields: DEFAULT_MAX_FIELDS,
            replay_on_attach: true,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen only for the standard broadcast
    pub fn standard_only() -> Self {
        Self {
            actions: vec![AUTONAVI_STANDARD_BROADCAST_SEND.to_string()],
            ..Default::default()
        }
    }

    /// Parse a (possibly partial) JSON document over the defaults and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BridgeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_listener_priority(mut self, priority: i32) -> Self {
        self.listener_priority = priority;
        self
    }

    pub fn with_max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields;
        self
    }

    pub fn with_replay_on_attach(mut self, replay: bool) -> Self {
        self.replay_on_attach = replay;
        self
    }

    /// Validate the configuration and return the first issue found
    pub fn validate(&self) -> Result<()> {
        if self.actions.is_empty() {
            return Err(BridgeError::Config(
                "At least one action must be configured".to_string(),
            ));
        }

        if self.actions.iter().any(|a| a.trim().is_empty()) {
            return Err(BridgeError::Config(
                "Action names must not be empty".to_string(),
            ));
        }

        if self.category.trim().is_empty() {
            return Err(BridgeError::Config(
                "Category must not be empty".to_string(),
            ));
        }

        if self.max_fields == 0 {
            return Err(BridgeError::Config(
                "Max fields must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
