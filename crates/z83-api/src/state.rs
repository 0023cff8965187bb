//! Application state.

use std::sync::Arc;

use z83_store::Store;

use crate::auth::TokenKeys;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    /// Create new application state. Signing keys are derived once here.
    pub fn new(config: ApiConfig, store: Arc<dyn Store>) -> Self {
        let tokens = Arc::new(TokenKeys::new(&config.auth));
        Self {
            config,
            store,
            tokens,
        }
    }
}
