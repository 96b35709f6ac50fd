//! surveystat-server: axum HTTP surface for survey statistics.
//!
//! Routes:
//! - `GET /health`
//! - `GET /surveys?status=<draft|active|closed>`
//! - `GET /surveys/:id/statistics`

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Extension, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use surveystat_core::traits::SurveyRepository;

pub use error::ApiError;

/// Build the router with all routes and middleware.
pub fn build_router(repository: Arc<dyn SurveyRepository>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/surveys", get(handlers::list_surveys))
        .route("/surveys/:id/statistics", get(handlers::survey_statistics))
        .layer(Extension(repository))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    repository: Arc<dyn SurveyRepository>,
) -> anyhow::Result<()> {
    let backend = repository.name().to_string();
    let app = build_router(repository);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, backend = %backend, "surveystat server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
