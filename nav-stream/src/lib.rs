//! # nav-stream
//!
//! Delivery side of navbridge: turns raw broadcasts into canonical events and
//! hands them to at most one subscriber.
//!
//! ```text
//! transport ──RawEvent──▶ EventProcessor ──route/normalize──▶ SubscriptionSlot ──▶ EventSink
//!                                                              (last event cache)
//! ```
//!
//! The [`BroadcastTransport`] trait is the seam to whatever physically carries
//! broadcasts. [`LoopbackTransport`] is an in-memory implementation used for
//! simulation and tests.

mod error;
pub mod iter;
pub mod loopback;
pub mod message;
pub mod processor;
pub mod sink;
pub mod slot;
pub mod transport;

pub use error::*;
pub use iter::EventIterator;
pub use loopback::LoopbackTransport;
pub use message::{BridgeFault, BridgeMessage};
pub use processor::{EventProcessor, ProcessOutcome};
pub use sink::{EventSink, FnSink};
pub use slot::SubscriptionSlot;
pub use transport::{
    BroadcastTransport, ListenerFilter, OutboundBroadcast, OutboundValue, RegistrationId,
};
