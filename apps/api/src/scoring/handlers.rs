//! Axum route handlers for the Validation API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::scoring::ScoreResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub resume: ResumeData,
    pub job_description: String,
}

/// POST /api/v1/validate
///
/// Scores a resume against a job description using the configured validator.
/// Any job description is accepted; one without keywords scores 0.
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    info!(
        "Validating resume for '{}' ({} mode)",
        request.resume.full_name,
        state.validator.mode()
    );

    let result = state
        .validator
        .validate(&request.resume, &request.job_description)
        .await?;

    Ok(Json(result))
}
