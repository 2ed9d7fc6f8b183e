use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::extract::Query;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use worksheet_catalog::WorksheetRecord;

use crate::api::server::routes;
use crate::api::state::AppState;
use crate::config::Endpoints;
use crate::upstream::{CatalogSource, EmailOutcome, EmailRequest, UpstreamError};

/// Placeholder used by test routers so assertions don't depend on the default.
pub const TEST_PLACEHOLDER: &str = "https://test.invalid/placeholder.png";

/// In-memory catalog source with canned responses.
pub struct StaticSource {
    pub worksheets: Result<Vec<WorksheetRecord>, fn() -> UpstreamError>,
    pub subjects: Value,
    pub email_outcome: EmailOutcome,
    pub sent: Mutex<Vec<EmailRequest>>,
}

impl StaticSource {
    pub fn new(worksheets: Vec<WorksheetRecord>) -> Self {
        Self {
            worksheets: Ok(worksheets),
            subjects: json!([{ "id": 1, "name": "Math" }]),
            email_outcome: EmailOutcome::Sent,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A source whose worksheet fetch always fails with `make_err()`.
    pub fn failing(make_err: fn() -> UpstreamError) -> Self {
        Self {
            worksheets: Err(make_err),
            ..Self::new(Vec::new())
        }
    }

    pub fn sent_requests(&self) -> Vec<EmailRequest> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn worksheets(&self) -> Result<Vec<WorksheetRecord>, UpstreamError> {
        match &self.worksheets {
            Ok(records) => Ok(records.clone()),
            Err(make_err) => Err(make_err()),
        }
    }

    async fn subjects(&self) -> Result<Value, UpstreamError> {
        Ok(self.subjects.clone())
    }

    async fn subtopics(&self, subject_id: &str) -> Result<Value, UpstreamError> {
        Ok(json!({ "subject_id": subject_id, "subtopics": [] }))
    }

    async fn send_email(&self, request: &EmailRequest) -> Result<EmailOutcome, UpstreamError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }
        Ok(self.email_outcome.clone())
    }
}

/// Router with no middleware, backed by `source`.
pub fn build_app(source: Arc<dyn CatalogSource>) -> Router {
    routes().with_state(AppState::new(source, TEST_PLACEHOLDER))
}

/// Worksheets used across integration tests.
pub fn sample_worksheets() -> Vec<WorksheetRecord> {
    let mut series = WorksheetRecord::new(
        1,
        "Arithmetic Reasoning",
        "Number Series",
        "Number Series Practice",
    );
    series.thumbnail_url = Some("https://cdn.example.org/series.png".to_string());

    vec![
        series,
        WorksheetRecord::new(2, "Arithmetic Reasoning", "Ratios", "Ratio Drills"),
        WorksheetRecord::new(3, "Word Knowledge", "Synonyms", "Synonym Match"),
        WorksheetRecord::new(
            4,
            "Arithmetic Reasoning",
            "Number Series",
            "number series practice",
        ),
        WorksheetRecord::new(5, "Arithmetic Reasoning", "Number Series", "Series Challenge"),
    ]
}

/// Canned bodies served by [`spawn_fake_upstream`].
#[derive(Clone)]
pub struct FakeUpstream {
    pub worksheets: Value,
    pub subjects: Value,
    pub email_reply: Value,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            worksheets: json!({ "status": "success", "data": sample_worksheets() }),
            subjects: json!([{ "id": 1, "name": "Arithmetic Reasoning" }]),
            email_reply: json!({ "success": true }),
        }
    }
}

/// Serve `fake` on an ephemeral local port using the default endpoint paths.
///
/// Returns the base URL to configure the upstream client with.
pub async fn spawn_fake_upstream(fake: FakeUpstream) -> Result<(String, JoinHandle<()>)> {
    let endpoints = Endpoints::default();
    let FakeUpstream {
        worksheets,
        subjects,
        email_reply,
    } = fake;

    let app = Router::new()
        .route(
            &endpoints.worksheets,
            get(move || {
                let body = worksheets.clone();
                async move { Json(body) }
            }),
        )
        .route(
            &endpoints.subjects,
            get(move || {
                let body = subjects.clone();
                async move { Json(body) }
            }),
        )
        .route(
            &endpoints.subtopics,
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({ "subtopics": [], "echo": params }))
            }),
        )
        .route(
            &endpoints.send_email,
            post(move |Json(_request): Json<Value>| {
                let reply = email_reply.clone();
                async move { Json(reply) }
            }),
        );

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{}", addr), handle))
}
