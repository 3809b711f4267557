//! In-memory broadcast transport.
//!
//! Keeps the set of registered filters and a log of everything dispatched. Each
//! dispatched broadcast that matches at least one active filter is forwarded,
//! once, as a [`RawEvent`] on the inbound channel. This mirrors how the platform
//! delivers a broadcast to a receiver regardless of how many of its filters
//! match.

use std::collections::BTreeMap;
use std::sync::mpsc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use nav_protocol::RawEvent;

use crate::error::TransportError;
use crate::transport::{BroadcastTransport, ListenerFilter, OutboundBroadcast, RegistrationId};

#[derive(Default)]
struct LoopbackState {
    next_id: u64,
    filters: BTreeMap<RegistrationId, ListenerFilter>,
    dispatched: Vec<OutboundBroadcast>,
}

/// Loopback transport feeding dispatched broadcasts back as inbound events
pub struct LoopbackTransport {
    state: Mutex<LoopbackState>,
    inbound: Mutex<mpsc::Sender<RawEvent>>,
}

impl LoopbackTransport {
    pub fn new(inbound: mpsc::Sender<RawEvent>) -> Self {
        Self {
            state: Mutex::new(LoopbackState::default()),
            inbound: Mutex::new(inbound),
        }
    }

    /// Transport plus the receiving end of its inbound channel
    pub fn channel() -> (Self, mpsc::Receiver<RawEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self::new(tx), rx)
    }

    /// Currently registered filters, ordered by registration
    pub fn active_filters(&self) -> Vec<ListenerFilter> {
        self.state.lock().filters.values().cloned().collect()
    }

    /// Every broadcast dispatched so far, in order
    pub fn dispatched(&self) -> Vec<OutboundBroadcast> {
        self.state.lock().dispatched.clone()
    }

    pub fn clear_dispatched(&self) {
        self.state.lock().dispatched.clear();
    }
}

impl BroadcastTransport for LoopbackTransport {
    fn register(&self, filter: &ListenerFilter) -> Result<RegistrationId, TransportError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = RegistrationId::new(state.next_id);
        state.filters.insert(id, filter.clone());
        debug!(id = %id, actions = filter.actions.len(), category = ?filter.category, "Registered loopback filter");
        Ok(id)
    }

    fn unregister(&self, id: RegistrationId) -> Result<(), TransportError> {
        self.state
            .lock()
            .filters
            .remove(&id)
            .map(|_| ())
            .ok_or(TransportError::RegistrationNotFound(id))
    }

    fn dispatch(&self, broadcast: &OutboundBroadcast) -> Result<(), TransportError> {
        let matched = {
            let mut state = self.state.lock();
            state.dispatched.push(broadcast.clone());
            state.filters.values().any(|f| f.matches(broadcast))
        };

        if !matched {
            trace!(action = %broadcast.action, category = ?broadcast.category, "No filter matched");
            return Ok(());
        }

        self.inbound
            .lock()
            .send(broadcast.to_raw_event())
            .map_err(|_| TransportError::DispatchFailed {
                action: broadcast.action.clone(),
                reason: "inbound channel closed".to_string(),
            })
    }
}

impl std::fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LoopbackTransport")
            .field("filters", &state.filters.len())
            .field("dispatched", &state.dispatched.len())
            .finish()
    }
}
