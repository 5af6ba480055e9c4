//! HTTP and WebSocket surface.

pub mod handlers;
pub mod router;
