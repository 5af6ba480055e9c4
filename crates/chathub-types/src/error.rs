use thiserror::Error;

/// A malformed inbound text frame.
///
/// Validation is a shape check only: the frame must be JSON carrying a
/// known event tag with all fields present. Content is never
/// sanitized here. A failed validation drops the frame; the sender is
/// not notified.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("malformed frame: {0}")]
    Malformed(String),
}

/// Errors from the durable message store.
///
/// A `StoreError` during append makes the hub drop the message without
/// broadcasting it -- durability-before-visibility. The failure is
/// logged for operators; there is no retry and no signal back to the
/// sending client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}
