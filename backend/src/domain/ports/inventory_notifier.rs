//! Outbound notification port.
//!
//! Notifications are fire-and-forget: services call [`InventoryNotifier::notify`]
//! after their transaction commits and never observe delivery failures.

use crate::domain::InventoryEvent;

/// Receives inventory events once they are durable.
#[cfg_attr(test, mockall::automock)]
pub trait InventoryNotifier: Send + Sync {
    /// Deliver `event`. Implementations must not block.
    fn notify(&self, event: InventoryEvent);
}

/// Notifier that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl InventoryNotifier for NoOpNotifier {
    fn notify(&self, _event: InventoryEvent) {}
}
