use std::sync::Arc;

use crate::scoring::validator::ResumeValidator;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Local keyword scorer or delegated analysis, chosen from SCORING_MODE.
    pub validator: Arc<dyn ResumeValidator>,
    /// Postgres or in-memory, chosen from STORE_BACKEND.
    pub store: Arc<dyn ResumeStore>,
}
