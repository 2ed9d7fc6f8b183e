//! Routes that forward upstream subject data without reshaping it.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

use super::errors::ApiError;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubtopicsQuery {
    pub subject_id: Option<String>,
}

// GET /api/subjects
pub async fn subjects(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.source.subjects().await?))
}

// GET /api/subtopics?subject_id=
pub async fn subtopics(
    State(state): State<AppState>,
    Query(params): Query<SubtopicsQuery>,
) -> Result<Json<Value>, ApiError> {
    let subject_id = params
        .subject_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing or invalid subject_id".to_string()))?;

    Ok(Json(state.source.subtopics(subject_id).await?))
}
