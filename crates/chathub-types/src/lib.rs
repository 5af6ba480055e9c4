//! Shared domain types for chathub.
//!
//! This crate contains the types that cross the relay's boundaries:
//! the persisted `ChatMessage`, the WebSocket wire events, and the
//! error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod error;
pub mod event;
pub mod message;
