//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `chathub-core` using sqlx with
//! split read/write pools. The log is append-only: one INSERT per
//! message, one full scan ordered by rowid for history replay.

use chathub_core::repository::MessageRepository;
use chathub_types::error::StoreError;
use chathub_types::message::ChatMessage;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for SqliteMessageRepository {
    async fn append(&self, msg: &ChatMessage) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO messages (username, timestamp, content) VALUES (?, ?, ?)")
            .bind(&msg.username)
            .bind(&msg.timestamp)
            .bind(&msg.content)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query("SELECT username, timestamp, content FROM messages ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut msgs = Vec::with_capacity(rows.len());
        for row in &rows {
            msgs.push(ChatMessage {
                username: row
                    .try_get("username")
                    .map_err(|e| StoreError::Query(e.to_string()))?,
                timestamp: row
                    .try_get("timestamp")
                    .map_err(|e| StoreError::Query(e.to_string()))?,
                content: row
                    .try_get("content")
                    .map_err(|e| StoreError::Query(e.to_string()))?,
            });
        }
        Ok(msgs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
