//! Abiturbot - Telegram bot for university applicants
//!
//! The bot answers questions about universities and their specialties,
//! navigates with inline buttons and keeps reference data in SQLite.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `storage`: connection pool, migrations, generic DAO and records
//! - `dialog`: payload parsing, message texts, keyboards and the router
//! - `loader`: bulk import of universities and specialties from JSON
//! - `telegram`: bot creation and the dispatcher schema

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod core;
pub mod dialog;
pub mod loader;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use dialog::{Input, Reply, Router};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
