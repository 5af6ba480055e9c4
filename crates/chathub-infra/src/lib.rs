//! Infrastructure layer for chathub.
//!
//! Contains the SQLite implementation of the repository trait defined
//! in `chathub-core`, plus config-file loading.

pub mod config;
pub mod sqlite;
