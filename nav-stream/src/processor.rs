//! Inbound event processing
//!
//! Routes each raw broadcast to its adapter, normalizes it inside a fault
//! boundary and publishes the result to the subscription slot.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error};

use nav_protocol::{route, CanonicalEvent, NormalizeContext, RawEvent, DEFAULT_MAX_FIELDS};

use crate::message::BridgeFault;
use crate::slot::SubscriptionSlot;

/// What happened to one inbound broadcast
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// A canonical event was published and cached
    Delivered(CanonicalEvent),
    /// Normalization failed as a whole and a fault was published instead
    Faulted(BridgeFault),
}

impl ProcessOutcome {
    pub fn event(&self) -> Option<&CanonicalEvent> {
        match self {
            ProcessOutcome::Delivered(event) => Some(event),
            ProcessOutcome::Faulted(_) => None,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, ProcessOutcome::Faulted(_))
    }
}

/// Drives raw events through routing and normalization into the slot
#[derive(Debug, Clone)]
pub struct EventProcessor {
    slot: Arc<SubscriptionSlot>,
    max_fields: usize,
}

impl EventProcessor {
    pub fn new(slot: Arc<SubscriptionSlot>) -> Self {
        Self {
            slot,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }

    pub fn with_max_fields(mut self, max_fields: usize) -> Self {
        self.max_fields = max_fields;
        self
    }

    pub fn slot(&self) -> &Arc<SubscriptionSlot> {
        &self.slot
    }

    /// Process one inbound broadcast to completion.
    ///
    /// Always publishes something: a canonical event, or a fault when the adapter
    /// raised a payload-level error or panicked.
    pub fn process(&self, raw: &RawEvent) -> ProcessOutcome {
        let adapter = route(&raw.action);
        let ctx = NormalizeContext::now().with_max_fields(self.max_fields);

        debug!(
            action = %raw.action,
            protocol = ?adapter.protocol(),
            fields = raw.len(),
            "Processing broadcast"
        );

        let result = panic::catch_unwind(AssertUnwindSafe(|| adapter.normalize(raw, &ctx)));

        let message = match result {
            Ok(Ok(event)) => {
                debug!(
                    action = %event.action,
                    protocol = ?event.protocol,
                    parsed = event.parsed_successfully,
                    skipped = event.diagnostics.len(),
                    "Normalized broadcast"
                );
                let delivered = self.slot.publish(event.clone());
                if !delivered {
                    debug!(action = %event.action, "No subscriber, event cached only");
                }
                return ProcessOutcome::Delivered(event);
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("adapter panicked: {}", panic_message(payload.as_ref())),
        };

        error!(action = %raw.action, error = %message, "Failed to normalize broadcast");
        let fault = BridgeFault::new(raw.action.clone(), message);
        self.slot.publish_fault(fault.clone());
        ProcessOutcome::Faulted(fault)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
