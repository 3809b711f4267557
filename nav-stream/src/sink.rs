//! Subscriber endpoints
//!
//! A sink is whatever the UI layer hands the bridge to receive messages on. The
//! slot calls [`EventSink::deliver`] while holding its lock, so implementations
//! must not block and must not call back into the slot.

use std::sync::mpsc;

use crate::error::SinkClosed;
use crate::message::BridgeMessage;

/// Receiving end for bridge messages
///
/// A sink that panics inside `deliver` is treated like a closed one: the slot
/// catches the panic, detaches the sink and carries on with the next event.
pub trait EventSink: Send {
    /// Hand one message to the subscriber.
    ///
    /// `Err(SinkClosed)` means the subscriber is gone and the slot should drop it.
    fn deliver(&mut self, message: BridgeMessage) -> Result<(), SinkClosed>;
}

impl EventSink for mpsc::Sender<BridgeMessage> {
    fn deliver(&mut self, message: BridgeMessage) -> Result<(), SinkClosed> {
        self.send(message).map_err(|_| SinkClosed)
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<BridgeMessage> {
    fn deliver(&mut self, message: BridgeMessage) -> Result<(), SinkClosed> {
        self.send(message).map_err(|_| SinkClosed)
    }
}

impl EventSink for Box<dyn EventSink> {
    fn deliver(&mut self, message: BridgeMessage) -> Result<(), SinkClosed> {
        (**self).deliver(message)
    }
}

/// Adapts a closure into a sink. The closure never reports closure.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: FnMut(BridgeMessage) + Send,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(BridgeMessage) + Send,
{
    fn deliver(&mut self, message: BridgeMessage) -> Result<(), SinkClosed> {
        (self.0)(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::BridgeFault;
    use std::sync::{Arc, Mutex};

    fn fault() -> BridgeMessage {
        BridgeFault::new("AMAP_AUTO_NAVI", "boom").into()
    }

    #[test]
    fn test_std_sender_reports_closed() {
        let (mut tx, rx) = mpsc::channel::<BridgeMessage>();
        assert!(tx.deliver(fault()).is_ok());
        assert_eq!(rx.try_recv().unwrap().method_name(), "onError");

        drop(rx);
        assert_eq!(tx.deliver(fault()), Err(SinkClosed));
    }

    #[test]
    fn test_tokio_sender_reports_closed() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BridgeMessage>();
        assert!(tx.deliver(fault()).is_ok());
        assert!(rx.try_recv().is_ok());

        drop(rx);
        assert_eq!(tx.deliver(fault()), Err(SinkClosed));
    }

    #[test]
    fn test_fn_sink_collects() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let mut sink = FnSink::new(move |msg: BridgeMessage| {
            seen_clone.lock().unwrap().push(msg.method_name());
        });

        sink.deliver(fault()).unwrap();
        sink.deliver(fault()).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["onError", "onError"]);
    }
}
