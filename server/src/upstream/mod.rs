//! Access to the upstream PHP content API.
//!
//! Handlers talk to a [`CatalogSource`] so the HTTP surface can be exercised
//! against in-memory data; [`UpstreamClient`] is the networked implementation.

pub mod client;
pub mod envelope;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use worksheet_catalog::WorksheetRecord;

pub use client::UpstreamClient;

/// Failure to obtain usable data from the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream {endpoint} responded with status {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("upstream {endpoint} returned invalid data: {reason}")]
    InvalidPayload {
        endpoint: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            UpstreamError::Transport { endpoint, .. }
            | UpstreamError::Status { endpoint, .. }
            | UpstreamError::InvalidPayload { endpoint, .. } => endpoint,
        }
    }

    /// True when upstream answered but the body was unusable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, UpstreamError::InvalidPayload { .. })
    }
}

/// Sanitized request for emailing a worksheet download link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub worksheet_id: serde_json::Number,
    pub subject: String,
    pub subtopic: String,
}

/// What the upstream mailer said about an [`EmailRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent,
    Rejected(String),
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmailReply {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl From<EmailReply> for EmailOutcome {
    fn from(reply: EmailReply) -> Self {
        if reply.success {
            EmailOutcome::Sent
        } else {
            EmailOutcome::Rejected(
                reply
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "Email sending failed.".to_string()),
            )
        }
    }
}

/// PHP replies use `1`, `"1"` or `true` interchangeably; anything JSON would
/// call truthy counts.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Source of catalog data for the HTTP handlers.
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    /// Every worksheet record, fetched fresh.
    async fn worksheets(&self) -> Result<Vec<WorksheetRecord>, UpstreamError>;

    /// Subject list, passed through untouched.
    async fn subjects(&self) -> Result<Value, UpstreamError>;

    /// Subtopic list for an upstream subject id, passed through untouched.
    async fn subtopics(&self, subject_id: &str) -> Result<Value, UpstreamError>;

    async fn send_email(&self, request: &EmailRequest) -> Result<EmailOutcome, UpstreamError>;
}
