//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::directline::{
    ConversationRegistry, DirectLineConfig, DirectLineError, DirectLineService,
};

/// Shared application state.
pub struct AppState {
    /// Client for the Direct Line relay API.
    pub directline: DirectLineService,
    /// Registry of conversations started through this proxy.
    pub registry: ConversationRegistry,
}

impl AppState {
    /// Create a new application state from the given relay configuration.
    ///
    /// # Errors
    /// Returns an error if the relay client cannot be created.
    pub fn new(config: DirectLineConfig) -> Result<Arc<Self>, DirectLineError> {
        let directline = DirectLineService::new(config)?;

        Ok(Arc::new(Self {
            directline,
            registry: ConversationRegistry::new(),
        }))
    }

    /// Create application state configured from the process environment.
    ///
    /// # Errors
    /// Returns an error if the relay client cannot be created.
    pub fn from_env() -> Result<Arc<Self>, DirectLineError> {
        Self::new(DirectLineConfig::from_env())
    }
}
