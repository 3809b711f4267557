//! The bridge facade
//!
//! Wires the listener lifecycle, the inbound processor, the subscription slot
//! and the fan-out emitter around one transport.

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use nav_protocol::{CanonicalEvent, Payload, RawEvent, Scalar};
use nav_stream::{
    BroadcastTransport, EventIterator, EventProcessor, EventSink, ListenerFilter, ProcessOutcome,
    SubscriptionSlot,
};

use crate::config::BridgeConfig;
use crate::emitter::{EmitReport, FanoutEmitter};
use crate::error::Result;
use crate::lifecycle::ListenerLifecycle;
use crate::samples::Sample;

/// Snapshot of the bridge state for host diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeStatus {
    pub active: bool,
    pub subscriber_attached: bool,
    pub registered_filters: usize,
    pub has_last_event: bool,
    pub listening_actions: Vec<String>,
}

/// Navigation broadcast bridge
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use nav_bridge::{Bridge, LoopbackTransport};
///
/// let (transport, inbound) = LoopbackTransport::channel();
/// let bridge = Bridge::new(Arc::new(transport));
/// let events = bridge.subscribe();
///
/// bridge.start().unwrap();
/// bridge.send_test("navigation").unwrap();
/// bridge.pump(&inbound);
///
/// let message = events.try_recv().unwrap();
/// assert_eq!(message.method_name(), "onNavigationData");
/// ```
pub struct Bridge {
    config: BridgeConfig,
    transport: Arc<dyn BroadcastTransport>,
    processor: EventProcessor,
    lifecycle: ListenerLifecycle,
    emitter: FanoutEmitter,
}

impl Bridge {
    /// Bridge with the default configuration
    pub fn new(transport: Arc<dyn BroadcastTransport>) -> Self {
        Self::build(transport, BridgeConfig::default())
    }

    pub fn with_config(transport: Arc<dyn BroadcastTransport>, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(transport, config))
    }

    fn build(transport: Arc<dyn BroadcastTransport>, config: BridgeConfig) -> Self {
        let slot = Arc::new(SubscriptionSlot::with_replay(config.replay_on_attach));
        let processor = EventProcessor::new(slot).with_max_fields(config.max_fields);
        let lifecycle = ListenerLifecycle::new(Arc::clone(&transport), &config);
        let emitter = FanoutEmitter::new(Arc::clone(&transport), config.category.clone());

        Self {
            config,
            transport,
            processor,
            lifecycle,
            emitter,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start listening. A no-op if already listening.
    pub fn start(&self) -> Result<()> {
        self.lifecycle.start()
    }

    /// Stop listening. Never fails; returns whether the bridge was listening.
    pub fn stop(&self) -> bool {
        self.lifecycle.stop()
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    pub fn registered_filters(&self) -> Vec<ListenerFilter> {
        self.lifecycle.registered_filters()
    }

    pub fn listening_actions(&self) -> Vec<String> {
        self.lifecycle.actions().to_vec()
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Process one inbound broadcast
    pub fn handle(&self, raw: &RawEvent) -> ProcessOutcome {
        self.processor.process(raw)
    }

    /// Process one inbound broadcast given as action and extras
    pub fn on_broadcast(
        &self,
        action: impl Into<String>,
        fields: BTreeMap<String, Option<Scalar>>,
    ) -> ProcessOutcome {
        self.handle(&RawEvent {
            action: action.into(),
            fields,
        })
    }

    /// Process every raw event currently queued on `inbound`.
    ///
    /// Returns the number processed.
    pub fn pump(&self, inbound: &mpsc::Receiver<RawEvent>) -> usize {
        let mut processed = 0;
        for raw in inbound.try_iter() {
            self.handle(&raw);
            processed += 1;
        }
        processed
    }

    // ------------------------------------------------------------------
    // Subscriber
    // ------------------------------------------------------------------

    /// Attach a subscriber, replacing any current one
    pub fn attach<S>(&self, sink: S) -> u64
    where
        S: EventSink + 'static,
    {
        self.processor.slot().attach(sink)
    }

    pub fn detach(&self) -> bool {
        self.processor.slot().detach()
    }

    /// Attach a channel subscriber and return a blocking iterator over it
    pub fn subscribe(&self) -> EventIterator {
        self.processor.slot().subscribe()
    }

    pub fn last_event(&self) -> Option<CanonicalEvent> {
        self.processor.slot().last_event()
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Fan `payload` out to every action in `actions`
    pub fn send<I, S>(&self, actions: I, payload: &Payload) -> EmitReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.emitter.emit(actions, payload)
    }

    /// Re-emit the last received event to every action in `actions`
    pub fn resend_last<I, S>(&self, actions: I) -> Option<EmitReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let event = self.last_event()?;
        Some(self.send(actions, &event.to_payload()))
    }

    /// Dispatch a named test sample.
    ///
    /// Returns the number of broadcasts the transport accepted.
    pub fn send_test(&self, sample: &str) -> Result<usize> {
        let sample: Sample = sample.parse()?;
        let mut sent = 0;

        for broadcast in sample.broadcasts(Utc::now().timestamp_millis()) {
            match self.transport.dispatch(&broadcast) {
                Ok(()) => sent += 1,
                Err(e) => warn!(
                    sample = %sample,
                    action = %broadcast.action,
                    error = %e,
                    "Failed to send test broadcast"
                ),
            }
        }

        debug!(sample = %sample, sent, "Sent test sample");
        Ok(sent)
    }

    pub fn status(&self) -> BridgeStatus {
        let slot = self.processor.slot();
        BridgeStatus {
            active: self.is_active(),
            subscriber_attached: slot.has_subscriber(),
            registered_filters: self.registered_filters().len(),
            has_last_event: slot.last_event().is_some(),
            listening_actions: self.listening_actions(),
        }
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        if self.lifecycle.stop() {
            info!("Bridge dropped while listening, listeners removed");
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("lifecycle", &self.lifecycle)
            .field("slot", self.processor.slot())
            .finish()
    }
}
