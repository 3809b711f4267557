//! # navbridge
//!
//! Listens for navigation telemetry broadcasts from in-car navigation apps,
//! normalizes every protocol variant into one [`CanonicalEvent`], delivers it to
//! a single UI subscriber and re-emits payloads under every historical action
//! name for compatibility.
//!
//! ```rust
//! use std::sync::Arc;
//! use nav_bridge::prelude::*;
//!
//! let (transport, inbound) = LoopbackTransport::channel();
//! let bridge = Bridge::new(Arc::new(transport));
//! bridge.start()?;
//!
//! let events = bridge.subscribe();
//! bridge.send_test("location")?;
//! bridge.pump(&inbound);
//!
//! let event = events.try_recv().and_then(BridgeMessage::into_event).unwrap();
//! assert_eq!(event.protocol, Protocol::LocationData);
//! # Ok::<(), nav_bridge::BridgeError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! nav-bridge (Bridge facade, config, lifecycle, fan-out, samples)
//!     ↓
//! nav-stream (processor, subscription slot, transport seam)
//!     ↓
//! nav-protocol (canonical model, router, adapters)
//! ```

pub mod bridge;
pub mod config;
pub mod emitter;
mod error;
pub mod lifecycle;
pub mod logging;
pub mod samples;

pub use bridge::{Bridge, BridgeStatus};
pub use config::BridgeConfig;
pub use emitter::{encode_payload, EmitReport, FanoutEmitter};
pub use error::{BridgeError, Result};
pub use lifecycle::ListenerLifecycle;
pub use samples::Sample;

// Re-export the types hosts need from the lower crates
pub use nav_protocol::{
    actions, CanonicalEvent, Payload, Protocol, RawEvent, Scalar, WireKind, WELL_KNOWN_FIELDS,
};
pub use nav_stream::{
    BridgeFault, BridgeMessage, BroadcastTransport, EventIterator, EventSink, FnSink,
    ListenerFilter, LoopbackTransport, OutboundBroadcast, OutboundValue, ProcessOutcome,
    RegistrationId, TransportError,
};

pub mod prelude {
    pub use crate::{
        Bridge, BridgeConfig, BridgeError, BridgeMessage, BroadcastTransport, CanonicalEvent,
        EventSink, FnSink, LoopbackTransport, Payload, Protocol, RawEvent, Sample, Scalar,
    };
}
