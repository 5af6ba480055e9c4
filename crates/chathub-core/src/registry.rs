//! Connection registry: the hub's only shared mutable state.
//!
//! Maps connection id to a handle holding that connection's outbound
//! queue. Built on `DashMap` so connect/disconnect can race against
//! fan-out iteration without a global lock. One `ConnectionRegistry`
//! is owned per hub instance -- it is deliberately not a process-wide
//! global, so independent hubs can coexist in tests.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// A frame queued for delivery to one specific connection.
///
/// Text frames are serialized once by the broadcaster and cloned per
/// recipient; binary frames carry opaque voice bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

/// One live client connection as seen by the hub.
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    /// Unique per connection, assigned at connect time. UUIDv7, never
    /// reused while the connection is live.
    pub id: Uuid,
    /// The connection task drains the paired receiver and writes each
    /// frame to the WebSocket.
    pub outbound: mpsc::UnboundedSender<OutboundFrame>,
}

impl ConnectionEntry {
    /// Queue a frame for this connection.
    ///
    /// Returns `false` if the connection's receiver is gone (the
    /// connection task exited). Callers treat that as a skipped
    /// recipient, never an error.
    pub fn send(&self, frame: OutboundFrame) -> bool {
        self.outbound.send(frame).is_ok()
    }
}

/// Registry of currently connected clients.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: DashMap<Uuid, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create and store an entry for a new connection.
    ///
    /// Returns the entry together with the receiving half of its
    /// outbound queue; the connection task owns the receiver.
    pub fn register(&self) -> (ConnectionEntry, mpsc::UnboundedReceiver<OutboundFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let entry = ConnectionEntry {
            id: Uuid::now_v7(),
            outbound: tx,
        };
        self.entries.insert(entry.id, entry.clone());
        (entry, rx)
    }

    /// Remove a connection's entry.
    ///
    /// Idempotent: disconnect can be detected from more than one code
    /// path (read error, close frame, send failure), and every path
    /// may call this safely.
    pub fn unregister(&self, id: Uuid) {
        self.entries.remove(&id);
    }

    /// Snapshot of all current entries for fan-out iteration.
    ///
    /// Entries cloned here stay usable even if the connection
    /// unregisters mid-broadcast; sends to it just start failing and
    /// are ignored.
    pub fn list(&self) -> Vec<ConnectionEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of currently registered connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_unique_ids() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register();
        let (b, _rx_b) = registry.register();

        assert_ne!(a.id, b.id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (entry, _rx) = registry.register();

        registry.unregister(entry.id);
        assert!(registry.is_empty());

        // Second removal must be a silent no-op.
        registry.unregister(entry.id);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = registry.register();
        let (_b, _rx_b) = registry.register();

        let snapshot = registry.list();
        assert_eq!(snapshot.len(), 2);

        // Removing after the snapshot does not shrink it.
        registry.unregister(a.id);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_send_delivers_to_receiver() {
        let registry = ConnectionRegistry::new();
        let (entry, mut rx) = registry.register();

        assert!(entry.send(OutboundFrame::Text("hello".to_string())));
        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, OutboundFrame::Text("hello".to_string()));
    }

    #[test]
    fn test_send_to_dropped_receiver_reports_failure() {
        let registry = ConnectionRegistry::new();
        let (entry, rx) = registry.register();
        drop(rx);

        // Send fails but does not panic -- the broadcaster skips it.
        assert!(!entry.send(OutboundFrame::Binary(vec![1, 2, 3])));
    }

    #[test]
    fn test_snapshot_entry_survives_concurrent_unregister() {
        let registry = ConnectionRegistry::new();
        let (entry, mut rx) = registry.register();

        let snapshot = registry.list();
        registry.unregister(entry.id);

        // The cloned sender still works while the receiver lives.
        assert!(snapshot[0].send(OutboundFrame::Text("late".to_string())));
        assert!(rx.try_recv().is_ok());
    }
}
