//! Handler types and dependencies

use std::sync::Arc;

use crate::dialog::Router;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub router: Arc<Router>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }
}
