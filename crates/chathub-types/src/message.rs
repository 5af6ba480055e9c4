//! The persisted chat message type.

use serde::{Deserialize, Serialize};

/// A single chat message as sent by a client and recorded by the hub.
///
/// All three fields are free-form client-supplied strings. `username`
/// carries no uniqueness or authentication guarantee, and `timestamp`
/// is a display string rendered by the client (e.g. "3:00 PM") -- it is
/// NOT sortable. Ordering across messages is storage insertion order,
/// never this field.
///
/// Once persisted a message is immutable; the relay never edits or
/// deletes records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display identity of the sender.
    pub username: String,
    /// Client-rendered display time, opaque to the hub.
    pub timestamp: String,
    /// Free-form message body. No length limit, no sanitization here;
    /// escaping is a presentation concern.
    pub content: String,
}
