//! Worksheet browsing routes: subject → subtopic → worksheet.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use worksheet_catalog::{PathQuery, Resolution, WorksheetRecord, distinct_subtopics};

use super::errors::ApiError;
use super::state::AppState;

/// Successful catalog response body.
#[derive(Debug, Serialize)]
pub struct CatalogResponse<T> {
    pub status: &'static str,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopics: Option<Vec<String>>,
}

impl<T> CatalogResponse<T> {
    fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
            subtopics: None,
        }
    }
}

type CatalogResult<T> = Result<Json<CatalogResponse<T>>, ApiError>;

/// Resolve `query` against a fresh upstream snapshot.
async fn resolve_records(
    state: &AppState,
    query: &PathQuery,
) -> Result<Vec<WorksheetRecord>, ApiError> {
    let records = state.source.worksheets().await?;
    let matched = query
        .resolve(&records)
        .into_records()
        .into_iter()
        .map(|record| record.with_thumbnail_fallback(&state.placeholder_thumbnail))
        .collect();
    Ok(matched)
}

// GET /api/worksheet
pub async fn list_all(State(state): State<AppState>) -> CatalogResult<Vec<WorksheetRecord>> {
    let records = resolve_records(&state, &PathQuery::root()).await?;
    Ok(Json(CatalogResponse::success(records)))
}

// GET /api/worksheets/{subject}
pub async fn list_by_subject(
    State(state): State<AppState>,
    Path(subject): Path<String>,
) -> CatalogResult<Vec<WorksheetRecord>> {
    let query = PathQuery::for_subject(&subject)?;
    let records = resolve_records(&state, &query).await?;
    let subtopics = distinct_subtopics(&records);

    Ok(Json(CatalogResponse {
        subtopics: Some(subtopics),
        ..CatalogResponse::success(records)
    }))
}

// GET /api/worksheets/{subject}/{subtopic}
pub async fn list_by_subtopic(
    State(state): State<AppState>,
    Path((subject, subtopic)): Path<(String, String)>,
) -> CatalogResult<Vec<WorksheetRecord>> {
    let query = PathQuery::for_subtopic(&subject, &subtopic)?;
    let records = resolve_records(&state, &query).await?;
    Ok(Json(CatalogResponse::success(records)))
}

// GET /api/worksheets/{subject}/{subtopic}/{worksheet}
pub async fn get_worksheet(
    State(state): State<AppState>,
    Path((subject, subtopic, worksheet)): Path<(String, String, String)>,
) -> CatalogResult<WorksheetRecord> {
    let query = PathQuery::for_worksheet(&subject, &subtopic, &worksheet)?;
    let records = state.source.worksheets().await?;
    let record = single_worksheet(&query, query.resolve(&records))?;

    Ok(Json(CatalogResponse::success(
        record.with_thumbnail_fallback(&state.placeholder_thumbnail),
    )))
}

fn single_worksheet<'a>(
    query: &PathQuery,
    resolution: Resolution<'a>,
) -> Result<&'a WorksheetRecord, ApiError> {
    match resolution {
        Resolution::Worksheet(Some(record)) => Ok(record),
        Resolution::Worksheet(None) => {
            tracing::debug!(%query, "worksheet not found");
            Err(ApiError::NotFound("Worksheet not found.".to_string()))
        }
        other => {
            tracing::error!(%query, ?other, "worksheet path resolved at the wrong depth");
            Err(ApiError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn records() -> Vec<WorksheetRecord> {
        vec![WorksheetRecord::new(1, "Math", "Addition", "Basic Addition")]
    }

    #[test]
    fn test_single_worksheet_found() {
        let records = records();
        let query = PathQuery::for_worksheet("math", "addition", "basic-addition").unwrap();
        let record = single_worksheet(&query, query.resolve(&records)).unwrap();
        assert_eq!(record.title, "Basic Addition");
    }

    #[test]
    fn test_single_worksheet_missing_is_not_found() {
        let records = records();
        let query = PathQuery::for_worksheet("math", "addition", "long-division").unwrap();
        let err = single_worksheet(&query, query.resolve(&records)).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_collection_resolution_is_internal_not_not_found() {
        let records = records();
        let query = PathQuery::for_worksheet("math", "addition", "basic-addition").unwrap();
        let collection = PathQuery::for_subject("math").unwrap().resolve(&records);

        let err = single_worksheet(&query, collection).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
