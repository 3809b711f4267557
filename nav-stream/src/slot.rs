//! Single-subscriber slot with a last-event cache
//!
//! At most one subscriber is attached at a time. The most recent canonical event
//! is cached so a subscriber attaching late still sees current state. Cache and
//! subscriber live under one lock and delivery happens inside it, so an attach
//! can never observe a cache update without also receiving the event.

use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use tracing::{debug, error, warn};

use nav_protocol::CanonicalEvent;

use crate::iter::EventIterator;
use crate::message::{BridgeFault, BridgeMessage};
use crate::sink::EventSink;

struct SlotState {
    subscriber: Option<Box<dyn EventSink>>,
    last: Option<CanonicalEvent>,
    /// Bumped on every attach
    generation: u64,
}

impl SlotState {
    /// Deliver to the current subscriber, dropping it if it has gone away or panicked
    fn deliver(&mut self, message: BridgeMessage) -> bool {
        let Some(sink) = self.subscriber.as_mut() else {
            return false;
        };
        match panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(message))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(generation = self.generation, error = %e, "Detaching closed subscriber");
                self.subscriber = None;
                false
            }
            Err(_) => {
                error!(generation = self.generation, "Subscriber panicked, detaching");
                self.subscriber = None;
                false
            }
        }
    }
}

/// Holds the subscriber and the last delivered event
pub struct SubscriptionSlot {
    state: Mutex<SlotState>,
    replay_on_attach: bool,
}

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::with_replay(true)
    }

    /// Slot that does or does not replay the cached event to new subscribers
    pub fn with_replay(replay_on_attach: bool) -> Self {
        Self {
            state: Mutex::new(SlotState {
                subscriber: None,
                last: None,
                generation: 0,
            }),
            replay_on_attach,
        }
    }

    /// Attach `sink`, replacing any current subscriber.
    ///
    /// When replay is enabled and an event is cached, the sink receives it before
    /// this returns. Returns the new subscriber generation.
    pub fn attach<S>(&self, sink: S) -> u64
    where
        S: EventSink + 'static,
    {
        let mut state = self.state.lock();
        state.generation += 1;
        let replaced = state.subscriber.replace(Box::new(sink)).is_some();
        debug!(generation = state.generation, replaced, "Subscriber attached");

        if self.replay_on_attach {
            if let Some(last) = state.last.clone() {
                state.deliver(BridgeMessage::Event(last));
            }
        }

        state.generation
    }

    /// Attach a channel and return a blocking iterator over it
    pub fn subscribe(&self) -> EventIterator {
        let (tx, rx) = mpsc::channel();
        self.attach(tx);
        EventIterator::new(rx)
    }

    /// Remove the subscriber. The cache is kept.
    ///
    /// Returns whether a subscriber was attached.
    pub fn detach(&self) -> bool {
        let mut state = self.state.lock();
        let was_attached = state.subscriber.take().is_some();
        if was_attached {
            debug!(generation = state.generation, "Subscriber detached");
        }
        was_attached
    }

    /// Cache `event` and deliver it to the subscriber, if any.
    ///
    /// Returns whether the event reached a subscriber.
    pub fn publish(&self, event: CanonicalEvent) -> bool {
        let mut state = self.state.lock();
        state.last = Some(event.clone());
        state.deliver(BridgeMessage::Event(event))
    }

    /// Deliver a fault. Faults are never cached.
    pub fn publish_fault(&self, fault: BridgeFault) -> bool {
        self.state.lock().deliver(BridgeMessage::Fault(fault))
    }

    pub fn last_event(&self) -> Option<CanonicalEvent> {
        self.state.lock().last.clone()
    }

    pub fn has_subscriber(&self) -> bool {
        self.state.lock().subscriber.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn replays_on_attach(&self) -> bool {
        self.replay_on_attach
    }
}

impl Default for SubscriptionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SubscriptionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SubscriptionSlot")
            .field("attached", &state.subscriber.is_some())
            .field("generation", &state.generation)
            .field("cached", &state.last.is_some())
            .field("replay_on_attach", &self.replay_on_attach)
            .finish()
    }
}
