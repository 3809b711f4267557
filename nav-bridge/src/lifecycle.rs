//! Listener lifecycle
//!
//! Registers the bridge's listener filters with the transport on `start` and
//! removes them on `stop`. Start/stop are presence-guarded rather than counted:
//! a second `start` is a no-op and one `stop` always tears everything down.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use nav_stream::{BroadcastTransport, ListenerFilter, RegistrationId, TransportError};

use crate::config::BridgeConfig;
use crate::error::Result;

/// Registrations made by one successful `start`
#[derive(Debug)]
struct ActiveRegistration {
    registrations: Vec<(RegistrationId, ListenerFilter)>,
}

/// Owns the listener registrations for a bridge
pub struct ListenerLifecycle {
    transport: Arc<dyn BroadcastTransport>,
    filters: Vec<ListenerFilter>,
    active: Mutex<Option<ActiveRegistration>>,
}

impl ListenerLifecycle {
    pub fn new(transport: Arc<dyn BroadcastTransport>, config: &BridgeConfig) -> Self {
        Self {
            transport,
            filters: listener_filters(config),
            active: Mutex::new(None),
        }
    }

    /// Register listeners unless already active.
    ///
    /// Succeeds if at least one registration went through. When every
    /// registration fails the lifecycle stays inactive and the last error is
    /// returned, so the caller may retry.
    pub fn start(&self) -> Result<()> {
        let mut active = self.active.lock();
        if active.is_some() {
            debug!("Listeners already registered, ignoring start");
            return Ok(());
        }

        let mut registrations = Vec::with_capacity(self.filters.len());
        let mut last_error: Option<TransportError> = None;

        for filter in &self.filters {
            match self.transport.register(filter) {
                Ok(id) => {
                    debug!(id = %id, category = ?filter.category, "Registered listener");
                    registrations.push((id, filter.clone()));
                }
                Err(e) => {
                    warn!(category = ?filter.category, error = %e, "Failed to register listener");
                    last_error = Some(e);
                }
            }
        }

        if registrations.is_empty() {
            if let Some(e) = last_error {
                return Err(e.into());
            }
        }

        info!(
            registered = registrations.len(),
            actions = self.filters.first().map_or(0, |f| f.actions.len()),
            "Listening for navigation broadcasts"
        );
        *active = Some(ActiveRegistration { registrations });
        Ok(())
    }

    /// Remove every registration from the matching `start`.
    ///
    /// Removal failures are logged and swallowed; the lifecycle always ends
    /// inactive. Returns whether anything was active.
    pub fn stop(&self) -> bool {
        let mut active = self.active.lock();
        let Some(registration) = active.take() else {
            debug!("Listeners not registered, ignoring stop");
            return false;
        };

        for (id, filter) in registration.registrations {
            match self.transport.unregister(id) {
                Ok(()) => debug!(id = %id, category = ?filter.category, "Unregistered listener"),
                Err(e) => warn!(id = %id, error = %e, "Failed to unregister listener"),
            }
        }

        info!("Stopped listening for navigation broadcasts");
        true
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Filters currently registered with the transport
    pub fn registered_filters(&self) -> Vec<ListenerFilter> {
        self.active
            .lock()
            .as_ref()
            .map(|a| a.registrations.iter().map(|(_, f)| f.clone()).collect())
            .unwrap_or_default()
    }

    /// Actions the listener filters cover
    pub fn actions(&self) -> &[String] {
        self.filters
            .first()
            .map(|f| f.actions.as_slice())
            .unwrap_or_default()
    }
}

/// One categorized and one plain filter over the configured actions.
///
/// Firmware builds differ in whether they attach the category, so both are
/// registered.
fn listener_filters(config: &BridgeConfig) -> Vec<ListenerFilter> {
    let plain = ListenerFilter::new(config.actions.iter().cloned())
        .with_priority(config.listener_priority);
    let categorized = plain.clone().with_category(config.category.clone());
    vec![categorized, plain]
}

impl std::fmt::Debug for ListenerLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerLifecycle")
            .field("filters", &self.filters)
            .field("active", &self.is_active())
            .finish()
    }
}
