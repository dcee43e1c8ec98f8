//! Registry of open WebSocket connections and fan-out.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::events::types::GatewayEvent;
use crate::observability::metrics;

/// Identifies one open connection.
pub type ConnectionId = Uuid;

/// Serialized event payload shared by every recipient.
pub type Payload = Arc<str>;

/// The set of currently open connections.
///
/// Cloning is cheap; all clones share the same set. Delivery is best effort
/// to whatever is registered at broadcast time.
#[derive(Clone, Default)]
pub struct EventHub {
    connections: Arc<DashMap<ConnectionId, mpsc::UnboundedSender<Payload>>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection. The receiver yields every event broadcast until
    /// [`unregister`](Self::unregister) is called or the receiver is dropped.
    pub fn register(&self) -> (ConnectionId, mpsc::UnboundedReceiver<Payload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.connections.insert(id, tx);

        metrics::record_ws_connections(self.connections.len());
        tracing::info!(connection_id = %id, open = self.connections.len(), "A client connected");
        (id, rx)
    }

    /// Remove a connection.
    pub fn unregister(&self, id: ConnectionId) {
        if self.connections.remove(&id).is_some() {
            metrics::record_ws_connections(self.connections.len());
            tracing::info!(connection_id = %id, open = self.connections.len(), "A client disconnected");
        }
    }

    /// Send an event to every open connection. Returns how many accepted it.
    pub fn broadcast(&self, event: &GatewayEvent) -> usize {
        let payload: Payload = match serde_json::to_string(event) {
            Ok(s) => s.into(),
            Err(e) => {
                tracing::warn!(event = event.name(), error = %e, "Failed to serialize event");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();
        for entry in self.connections.iter() {
            if entry.value().send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        // Removal must happen after the iterator's shard locks are released.
        for id in closed {
            self.unregister(id);
        }

        metrics::record_event(event.name(), delivered);
        tracing::debug!(event = event.name(), delivered, "Event broadcast");
        delivered
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("connections", &self.connections.len())
            .finish()
    }
}
