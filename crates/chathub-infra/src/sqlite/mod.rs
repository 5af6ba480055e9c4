//! SQLite persistence for the message log.

pub mod message;
pub mod pool;

pub use message::SqliteMessageRepository;
pub use pool::DatabasePool;
