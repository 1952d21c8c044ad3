use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::ContentProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text generator. `None` when no API key is configured.
    pub provider: Option<Arc<dyn ContentProvider>>,
}

impl AppState {
    pub fn new(config: Config, provider: Option<Arc<dyn ContentProvider>>) -> Self {
        Self { config, provider }
    }

    /// The configured provider, or 503 for generation endpoints.
    pub fn provider(&self) -> Result<&dyn ContentProvider, AppError> {
        self.provider.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable(
                "Text generation is not configured (GEMINI_API_KEY is unset)".to_string(),
            )
        })
    }
}
