//! Message repository trait definition.
//!
//! Defines the storage interface for the durable message log. The
//! infrastructure layer (chathub-infra) implements this trait with
//! SQLite persistence.

use chathub_types::error::StoreError;
use chathub_types::message::ChatMessage;

/// Repository trait for the append-only message log.
///
/// The log is never updated or pruned by the relay: the only
/// operations are a single-record append and a full scan in insertion
/// order.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait MessageRepository: Send + Sync {
    /// Persist one message. Must complete before the message becomes
    /// eligible for broadcast.
    fn append(
        &self,
        msg: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read the entire log in storage-insertion order.
    ///
    /// Insertion order, not `timestamp` order -- the timestamp field
    /// is a display string and is never sorted on.
    fn scan_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;
}
