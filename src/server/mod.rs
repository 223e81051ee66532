//! HTTP API
//!
//! - `GET /api/score/{username}?scheme=model|advanced` - score report as JSON
//! - `GET /health` - liveness probe
//!
//! Scoring runs on tokio's blocking pool because collection uses sync HTTP.
//! Any failure while scoring comes back as a 500 with the error text as a
//! plain-text body. CORS allows every origin, method and header.

use crate::pipeline::Pipeline;
use crate::scoring::Scheme;
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared state of the HTTP handlers
pub struct AppState {
    pub pipeline: Pipeline,
    /// Scheme used when the request does not name one
    pub default_scheme: Scheme,
}

impl AppState {
    pub fn new(pipeline: Pipeline, default_scheme: Scheme) -> Self {
        Self {
            pipeline,
            default_scheme,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreParams {
    scheme: Option<String>,
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/score/{username}", get(score_user))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn score_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(params): Query<ScoreParams>,
) -> Response {
    let scheme = match params.scheme.as_deref() {
        Some(s) => match Scheme::from_str(s) {
            Ok(scheme) => scheme,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        },
        None => state.default_scheme,
    };

    info!("Scoring request for {} ({} scheme)", username, scheme);
    let worker_state = state.clone();
    let worker_user = username.clone();
    let result = tokio::task::spawn_blocking(move || {
        worker_state.pipeline.score_user(&worker_user, scheme)
    })
    .await;

    match result {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(e)) => {
            error!("Scoring {} failed: {}", username, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to calculate score: {}", e),
            )
                .into_response()
        }
        Err(e) => {
            error!("Scoring task for {} panicked: {}", username, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Serve the API until Ctrl-C
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> Result<()> {
    let router = router(state);
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
