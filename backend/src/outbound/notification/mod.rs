//! Adapters for the [`InventoryNotifier`] port.
//!
//! Services publish only after their transaction commits, so adapters see
//! durable changes. Neither adapter can fail the caller: delivery problems
//! are logged and dropped.
//!
//! [`InventoryNotifier`]: crate::domain::ports::InventoryNotifier

mod channel_notifier;
mod tracing_notifier;

pub use channel_notifier::ChannelNotifier;
pub use tracing_notifier::TracingNotifier;
