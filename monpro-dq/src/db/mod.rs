//! Database access for the diagnostic service
//!
//! SQLite via sqlx: the battlecard vault and the durable submission
//! cooldown store.

pub mod battlecards;
pub mod cooldowns;
mod init;

pub use init::{init_database_pool, initialize_schema};
