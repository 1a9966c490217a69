//! Explicit "current service" indirection with hot-swap support.
//!
//! Hosts that need to replace the backing SDK at runtime pass a
//! [`ServiceSlot`] down instead of a bare service. Dependents watch the
//! slot and rebind when it changes.

use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tokio::sync::watch;

use super::traits::AccessService;

/// Log entry for a service swap.
#[derive(Debug, Clone)]
pub struct SwapLogEntry {
    pub timestamp: SystemTime,
    pub old_service: String,
    pub new_service: String,
}

/// Shared handle to the service currently backing the UI.
#[derive(Clone)]
pub struct ServiceSlot {
    current: Arc<watch::Sender<Arc<dyn AccessService>>>,
    swap_log: Arc<RwLock<Vec<SwapLogEntry>>>,
}

impl ServiceSlot {
    pub fn new(service: Arc<dyn AccessService>) -> Self {
        let (current, _) = watch::channel(service);
        Self {
            current: Arc::new(current),
            swap_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The service in use right now.
    pub fn current(&self) -> Arc<dyn AccessService> {
        self.current.borrow().clone()
    }

    /// Replace the backing service and notify subscribers.
    ///
    /// The previous service is not deactivated; that is the caller's call.
    pub fn replace(&self, service: Arc<dyn AccessService>) {
        let new_name = service.name().to_string();
        let old = self.current.send_replace(service);
        let old_name = old.name().to_string();

        tracing::info!(
            old_service = %old_name,
            new_service = %new_name,
            "Access service swapped"
        );

        self.swap_log.write().push(SwapLogEntry {
            timestamp: SystemTime::now(),
            old_service: old_name,
            new_service: new_name,
        });
    }

    /// Receiver that is notified on every [`replace`](ServiceSlot::replace).
    pub fn subscribe(&self) -> watch::Receiver<Arc<dyn AccessService>> {
        self.current.subscribe()
    }

    pub fn swap_log(&self) -> Vec<SwapLogEntry> {
        self.swap_log.read().clone()
    }
}
