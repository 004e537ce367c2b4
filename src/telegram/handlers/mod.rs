//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers only translate updates into router inputs and send the reply.

mod schema;
mod types;

pub use schema::{schema, send_reply};
pub use types::{HandlerDeps, HandlerError};
