//! Axum route handlers for the saved-resume API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::saved_resume::SavedResume;
use crate::state::AppState;
use crate::store::normalize_tags;

#[derive(Debug, Deserialize)]
pub struct SaveResumeRequest {
    pub resume: ResumeData,
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Builds the list filter from the query string. `tags=a,b` is split on
/// commas; each `tag=...` is taken whole, so it may contain a comma.
fn tag_filter(params: &[(String, String)]) -> Vec<String> {
    let mut filter = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "tags" => filter.extend(value.split(',').map(str::to_string)),
            "tag" => filter.push(value.clone()),
            _ => {}
        }
    }
    normalize_tags(&filter)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResumesResponse {
    pub resumes: Vec<SavedResume>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResumeResponse {
    pub success: bool,
}

/// POST /api/v1/resumes
pub async fn handle_save_resume(
    State(state): State<AppState>,
    Json(request): Json<SaveResumeRequest>,
) -> Result<Json<SavedResume>, AppError> {
    let saved = state
        .store
        .save(request.resume, &request.version, &normalize_tags(&request.tags))
        .await?;
    Ok(Json(saved))
}

/// GET /api/v1/resumes?tags=a,b&tag=c
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ListResumesResponse>, AppError> {
    let listing = state.store.list(&tag_filter(&params)).await?;
    if !listing.skipped.is_empty() {
        warn!(
            "Listed {} resumes, skipped {} with undecodable data",
            listing.resumes.len(),
            listing.skipped.len()
        );
    }
    Ok(Json(ListResumesResponse {
        resumes: listing.resumes,
    }))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResumeResponse>, AppError> {
    state.store.delete(&id).await?;
    Ok(Json(DeleteResumeResponse { success: true }))
}
