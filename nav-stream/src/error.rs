//! Error types for the nav-stream crate.

use crate::transport::RegistrationId;

/// Errors reported by a [`crate::BroadcastTransport`] implementation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The platform refused to register the listener
    #[error("Failed to register listener: {0}")]
    RegistrationFailed(String),

    /// The registration is not (or no longer) known to the transport
    #[error("Registration not found: {0}")]
    RegistrationNotFound(RegistrationId),

    /// Removing the listener failed for another reason
    #[error("Failed to unregister listener: {0}")]
    UnregistrationFailed(String),

    /// Sending an outbound broadcast failed
    #[error("Failed to dispatch broadcast {action}: {reason}")]
    DispatchFailed { action: String, reason: String },
}

/// Returned by a sink whose receiving end has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Event sink is closed")]
pub struct SinkClosed;
