pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::scoring::handlers as scoring;
use crate::state::AppState;
use crate::store::handlers as store;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Validation API
        .route("/api/v1/validate", post(scoring::handle_validate))
        // Saved resume API
        .route(
            "/api/v1/resumes",
            post(store::handle_save_resume).get(store::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", delete(store::handle_delete_resume))
        .with_state(state)
}
