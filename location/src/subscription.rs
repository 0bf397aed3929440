use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::{LocationResult, ProviderListener, ProviderMonitor};

/// Identifier of one provider broadcast registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw registration id chosen by the monitor.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw registration id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// An owned provider broadcast registration.
///
/// The registration is removed exactly once, either by [`release`] or when
/// the handle is dropped.
///
/// [`release`]: ProviderSubscription::release
pub struct ProviderSubscription {
    monitor: Arc<dyn ProviderMonitor>,
    id: Option<SubscriptionId>,
}

impl fmt::Debug for ProviderSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl ProviderSubscription {
    /// Register `listener` with `monitor`.
    ///
    /// # Errors
    /// Returns the monitor's error if registration failed.
    pub fn acquire(
        monitor: Arc<dyn ProviderMonitor>,
        listener: Arc<dyn ProviderListener>,
    ) -> LocationResult<Self> {
        let id = monitor.subscribe(listener)?;
        debug!("provider subscription {} acquired", id.raw());
        Ok(Self {
            monitor,
            id: Some(id),
        })
    }

    /// The registration id, or `None` once released.
    #[must_use]
    pub const fn id(&self) -> Option<SubscriptionId> {
        self.id
    }

    /// Whether the registration is still held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Remove the registration. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.monitor.unsubscribe(id);
            debug!("provider subscription {} released", id.raw());
        }
    }
}

impl Drop for ProviderSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
