//! The relay hub: ingest, persist-then-broadcast, history replay, and
//! the voice pass-through channel.
//!
//! One `RelayHub` mediates all fan-out for its set of connections. The
//! policy throughout is terminal-and-local error handling: a malformed
//! frame is dropped with a warning, a failed append drops the message
//! before any client sees it, and a failed delivery to one connection
//! never disturbs the others. Nothing is retried and nothing is
//! surfaced back to the sending client.

use std::sync::Arc;

use chathub_types::error::{StoreError, ValidationError};
use chathub_types::event::{ClientEvent, ServerEvent};
use chathub_types::message::ChatMessage;
use tokio::sync::mpsc;

use crate::registry::{ConnectionEntry, ConnectionRegistry, OutboundFrame};
use crate::repository::MessageRepository;

/// Everything a connection task needs once its socket is open.
///
/// Produced by [`RelayHub::open_connection`]. The contract for the
/// wire is: write `history_frame` first, then drain `live_rx`. That
/// ordering is what guarantees a new client sees the backlog before
/// any live message.
pub struct OpenedConnection {
    /// The registry entry for this connection.
    pub entry: ConnectionEntry,
    /// Receiving half of the connection's live queue.
    pub live_rx: mpsc::UnboundedReceiver<OutboundFrame>,
    /// Pre-serialized `previousMessages` frame, or `None` if the scan
    /// failed -- the connection then starts without backlog.
    pub history_frame: Option<String>,
}

/// Central relay over one registry and one durable store.
pub struct RelayHub<R> {
    store: Arc<R>,
    registry: ConnectionRegistry,
}

impl<R: MessageRepository> RelayHub<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self {
            store,
            registry: ConnectionRegistry::new(),
        }
    }

    /// The registry owned by this hub instance.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Validate one inbound text frame.
    ///
    /// Shape check only: the frame must deserialize into a known event
    /// with every field present. Field content is not inspected.
    pub fn ingest(&self, raw: &str) -> Result<ChatMessage, ValidationError> {
        match serde_json::from_str::<ClientEvent>(raw) {
            Ok(ClientEvent::Message(msg)) => Ok(msg),
            Err(err) => Err(ValidationError::Malformed(err.to_string())),
        }
    }

    /// Durably record a message, then fan it out to every connection,
    /// the sender included.
    ///
    /// The append is awaited before any client sees the message
    /// (durability-before-visibility). While it is in flight only this
    /// message's broadcast waits; other connections keep ingesting.
    /// On append failure the message is dropped: logged for operators,
    /// never broadcast, never retried.
    pub async fn persist_and_broadcast(&self, msg: ChatMessage) {
        if let Err(err) = self.store.append(&msg).await {
            tracing::error!(
                username = %msg.username,
                error = %err,
                "store append failed, message dropped without broadcast"
            );
            return;
        }
        self.broadcast(ServerEvent::Message(msg));
    }

    /// Process one inbound text frame end to end.
    ///
    /// Malformed frames are dropped with a warning; the sender gets no
    /// negative acknowledgement.
    pub async fn handle_text(&self, raw: &str) {
        match self.ingest(raw) {
            Ok(msg) => self.persist_and_broadcast(msg).await,
            Err(err) => {
                tracing::warn!(raw = %raw, error = %err, "ignoring malformed frame");
            }
        }
    }

    /// Open a connection: register it, then capture its history batch.
    ///
    /// Registration happens before the scan, so live broadcasts start
    /// queueing on `live_rx` immediately; the caller writes
    /// `history_frame` to the socket before draining that queue, which
    /// keeps the batch first on the wire. A message persisted while
    /// the scan runs may land in both the batch and the queue, or in
    /// neither -- the accepted replay race.
    ///
    /// A failed scan is logged and yields `history_frame: None`; the
    /// connection proceeds without backlog.
    pub async fn open_connection(&self) -> OpenedConnection {
        let (entry, live_rx) = self.registry.register();

        let history_frame = match self.history_event().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(json),
                Err(err) => {
                    tracing::warn!(conn_id = %entry.id, error = %err, "failed to serialize history batch");
                    None
                }
            },
            Err(err) => {
                tracing::error!(
                    conn_id = %entry.id,
                    error = %err,
                    "history scan failed, connection starts without backlog"
                );
                None
            }
        };

        OpenedConnection {
            entry,
            live_rx,
            history_frame,
        }
    }

    /// Build the one-shot history batch for a new connection.
    ///
    /// The caller writes this frame to the new socket before draining
    /// that connection's live queue, so the batch is always first on
    /// the wire. A message appended while the scan runs may show up in
    /// both the batch and the live queue, or in neither -- an accepted
    /// race, inherited from the source protocol, not silently locked
    /// away here.
    pub async fn history_event(&self) -> Result<ServerEvent, StoreError> {
        let messages = self.store.scan_all().await?;
        Ok(ServerEvent::PreviousMessages { messages })
    }

    /// Fan an opaque voice payload out to every connection.
    ///
    /// No validation, no persistence, no replay: the bytes exist only
    /// for the duration of this call. Delivery failures are silent and
    /// per-recipient, as with text broadcast.
    pub fn relay_voice(&self, bytes: Vec<u8>) {
        for entry in self.registry.list() {
            entry.send(OutboundFrame::Binary(bytes.clone()));
        }
    }

    /// Serialize an event once and queue it on every connection.
    ///
    /// A send whose receiver is gone (connection mid-close) is skipped;
    /// its entry is removed by the connection task's own unregister.
    fn broadcast(&self, event: ServerEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize broadcast event");
                return;
            }
        };

        for entry in self.registry.list() {
            entry.send(OutboundFrame::Text(json.clone()));
        }
    }
}
