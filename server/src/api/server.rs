use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use super::state::AppState;
use super::{email, passthrough, worksheets};
use crate::config::Server;

pub async fn healthz() -> &'static str {
    "ok"
}

fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    ApiError::Internal.into_response()
}

/// Routes without any middleware, ready to be given state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/worksheet", get(worksheets::list_all))
        .route("/api/worksheets/{subject}", get(worksheets::list_by_subject))
        .route(
            "/api/worksheets/{subject}/{subtopic}",
            get(worksheets::list_by_subtopic),
        )
        .route(
            "/api/worksheets/{subject}/{subtopic}/{worksheet}",
            get(worksheets::get_worksheet),
        )
        .route("/api/subjects", get(passthrough::subjects))
        .route("/api/subtopics", get(passthrough::subtopics))
        .route("/api/send-email", post(email::send_email))
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]))
}

pub fn build_api_router(state: AppState, server: &Server) -> Result<Router> {
    Ok(routes()
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.allowed_origins)?)
        .with_state(state))
}

pub async fn run_api(state: AppState, server: Server, shutdown: CancellationToken) -> Result<()> {
    let router = build_api_router(state, &server)?;
    let listener = tokio::net::TcpListener::bind(&server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", server.listen_addr))?;

    tracing::info!("Worksheets API listening on {}", server.listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}
