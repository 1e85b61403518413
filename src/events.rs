// Live notifications fanned out to WebSocket subscribers.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::db::ClanRequestStatus;

/// Events published by the panel. Serialized with a `type` tag.
#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum PanelEvent {
    /// Greeting sent to each new WebSocket client.
    #[serde(rename = "connected")]
    Connected { message: String },
    /// A running bot credited glory to an account.
    #[serde(rename = "reward_event")]
    Reward {
        account_id: String,
        amount: i64,
        timestamp: String,
    },
    /// A clan request reached its terminal status.
    #[serde(rename = "clan_request_resolved")]
    ClanRequestResolved {
        request_id: i64,
        account_id: String,
        clan_id: String,
        status: ClanRequestStatus,
    },
}

/// Broadcast hub for [`PanelEvent`]s.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<PanelEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: PanelEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("No subscribers for panel event");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
