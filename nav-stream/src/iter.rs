//! Blocking iterator over delivered bridge messages
//!
//! Returned by [`crate::SubscriptionSlot::subscribe`] for consumers that do not
//! want to supply their own sink.

use std::sync::mpsc;
use std::time::Duration;

use nav_protocol::CanonicalEvent;

use crate::message::BridgeMessage;

/// Blocking iterator over bridge messages.
///
/// `next()` blocks until a message arrives or the subscription is replaced or
/// detached, at which point the iterator ends.
pub struct EventIterator {
    rx: mpsc::Receiver<BridgeMessage>,
}

impl EventIterator {
    pub(crate) fn new(rx: mpsc::Receiver<BridgeMessage>) -> Self {
        Self { rx }
    }

    /// Block until a message is available.
    ///
    /// Returns `None` once the subscription is gone.
    pub fn recv(&self) -> Option<BridgeMessage> {
        self.rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<BridgeMessage> {
        self.rx.try_recv().ok()
    }

    /// Block until a message is available or `timeout` expires
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BridgeMessage> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Non-blocking iterator over messages already queued
    pub fn try_iter(&self) -> TryIterator<'_> {
        TryIterator { inner: self }
    }

    /// Iterator that waits up to `timeout` for each message
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIterator<'_> {
        TimeoutIterator {
            inner: self,
            timeout,
        }
    }

    /// Only the canonical events, skipping faults
    pub fn events(self) -> impl Iterator<Item = CanonicalEvent> {
        self.filter_map(BridgeMessage::into_event)
    }
}

impl Iterator for EventIterator {
    type Item = BridgeMessage;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

pub struct TryIterator<'a> {
    inner: &'a EventIterator,
}

impl Iterator for TryIterator<'_> {
    type Item = BridgeMessage;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

pub struct TimeoutIterator<'a> {
    inner: &'a EventIterator,
    timeout: Duration,
}

impl Iterator for TimeoutIterator<'_> {
    type Item = BridgeMessage;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::BridgeFault;

    #[test]
    fn test_try_recv_empty() {
        let (_tx, rx) = mpsc::channel();
        let iter = EventIterator::new(rx);
        assert!(iter.try_recv().is_none());
    }

    #[test]
    fn test_recv_timeout_empty() {
        let (_tx, rx) = mpsc::channel();
        let iter = EventIterator::new(rx);

        let start = std::time::Instant::now();
        assert!(iter.recv_timeout(Duration::from_millis(50)).is_none());
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_try_iter_drains_queued() {
        let (tx, rx) = mpsc::channel();
        let iter = EventIterator::new(rx);

        tx.send(BridgeFault::new("A", "one").into()).unwrap();
        tx.send(BridgeFault::new("B", "two").into()).unwrap();

        let actions: Vec<_> = iter
            .try_iter()
            .filter_map(|m| m.as_fault().map(|f| f.action.clone()))
            .collect();
        assert_eq!(actions, vec!["A", "B"]);
        assert!(iter.try_recv().is_none());
    }

    #[test]
    fn test_ends_when_sender_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut iter = EventIterator::new(rx);
        tx.send(BridgeFault::new("A", "one").into()).unwrap();
        drop(tx);

        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
    }
}
