//! Relay logic and repository trait definitions for chathub.
//!
//! This crate defines the "port" (the message repository trait) that the
//! infrastructure layer implements, plus the two pieces of hub state:
//! the connection registry and the relay hub itself. It depends only on
//! `chathub-types` -- never on `chathub-infra` or any database/IO crate.

pub mod hub;
pub mod registry;
pub mod repository;
