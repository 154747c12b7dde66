use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::FeedbackModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The model that writes the feedback. `GeminiClient` in production.
    pub model: Arc<dyn FeedbackModel>,
}
