//! Notifier forwarding events to an in-process consumer.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::domain::InventoryEvent;
use crate::domain::ports::InventoryNotifier;

/// Sends events down an unbounded Tokio channel.
///
/// A mailer or websocket fan-out task owns the receiving end. Once that task
/// stops, events are dropped.
///
/// # Examples
/// ```
/// use stockroom::domain::ports::InventoryNotifier;
/// use stockroom::domain::{AssetId, InventoryEvent, TenantId};
/// use stockroom::outbound::notification::ChannelNotifier;
///
/// let (notifier, mut events) = ChannelNotifier::channel();
/// notifier.notify(InventoryEvent::AssetProvisioned {
///     tenant_id: TenantId::random(),
///     asset_id: AssetId::random(),
///     tag: "CompDes001".to_owned(),
///     name: "PLAN-ICT-DES01".to_owned(),
/// });
/// assert_eq!(events.try_recv().map(|event| event.kind()), Ok("asset_provisioned"));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<InventoryEvent>,
}

impl ChannelNotifier {
    /// Wrap an existing sender.
    pub const fn new(sender: UnboundedSender<InventoryEvent>) -> Self {
        Self { sender }
    }

    /// A notifier and the receiver its events arrive on.
    pub fn channel() -> (Self, UnboundedReceiver<InventoryEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl InventoryNotifier for ChannelNotifier {
    fn notify(&self, event: InventoryEvent) {
        if let Err(err) = self.sender.send(event) {
            debug!(event = err.0.kind(), "event receiver closed; dropping event");
        }
    }
}
