use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::{Value, json};

use super::errors::ApiError;
use super::state::AppState;
use crate::upstream::{EmailOutcome, UpstreamError};
use crate::validation::email::{INVALID_EMAIL_REQUEST, parse_email_request};

// POST /api/send-email
pub async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("rejected send-email body: {}", rejection);
        ApiError::BadRequest(INVALID_EMAIL_REQUEST.to_string())
    })?;

    let request = parse_email_request(&body).map_err(|msg| ApiError::BadRequest(msg.to_string()))?;

    match state.source.send_email(&request).await {
        Ok(EmailOutcome::Sent) => Ok(Json(json!({ "success": true }))),
        Ok(EmailOutcome::Rejected(reason)) => Err(ApiError::BadRequest(reason)),
        Err(UpstreamError::Transport { .. } | UpstreamError::Status { .. }) => {
            Err(ApiError::BadGateway("Failed to send email.".to_string()))
        }
        Err(err) => Err(err.into()),
    }
}
