//! Conversation logic: payload parsing, texts, keyboards and routing

pub mod action;
pub mod format;
pub mod keyboards;
pub mod router;

pub use action::Action;
pub use router::{Input, Reply, Router};
