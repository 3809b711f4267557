//! # nav-protocol
//!
//! Canonical event model and protocol adapters for navigation broadcast telemetry.
//!
//! Navigation apps publish their telemetry under several historically incompatible
//! action names and key conventions. This crate converges all of them onto a single
//! [`CanonicalEvent`]:
//!
//! ```text
//! RawEvent ──route(action)──▶ Adapter ──normalize──▶ CanonicalEvent
//!                              │
//!                              ├─ Navigation  (AMAP_AUTO_NAVI, AMAP_AUTO_NAVI_DATA, ...)
//!                              ├─ Location    (AMAP_AUTO_LOCATION)
//!                              ├─ Standard    (AUTONAVI_STANDARD_BROADCAST_SEND)
//!                              └─ Unknown     (everything else)
//! ```
//!
//! Adapters are tolerant: a field that cannot be coerced is skipped and recorded in
//! [`CanonicalEvent::diagnostics`], the rest of the event still goes through.
//!
//! ## Usage
//!
//! ```rust
//! use nav_protocol::{actions, normalize, NormalizeContext, Protocol, RawEvent, Scalar};
//!
//! let raw = RawEvent::new(actions::AMAP_AUTO_NAVI)
//!     .with_field("routeDistance", 1500)
//!     .with_field("nextTurn", "right");
//!
//! let event = normalize(&raw, &NormalizeContext::now()).unwrap();
//! assert_eq!(event.protocol, Protocol::NavigationData);
//! assert_eq!(event.field("routeDistance"), Some(&Scalar::Int(1500)));
//! assert!(event.parsed_successfully);
//! ```

pub mod actions;
pub mod adapters;
pub mod error;
pub mod event;
pub mod fields;
pub mod router;
pub mod scalar;

pub use adapters::{Adapter, NormalizeContext, DEFAULT_MAX_FIELDS};
pub use error::{AdapterError, SkipReason};
pub use event::{CanonicalEvent, FieldDiagnostic, Payload, Protocol, RawEvent};
pub use fields::{well_known, WellKnownField, WireKind, WELL_KNOWN_FIELDS};
pub use router::{normalize, route};
pub use scalar::{Scalar, ScalarKind};
