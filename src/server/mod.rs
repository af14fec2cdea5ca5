//! HTTP surface: route registration, request validation, and JSON
//! response shaping for the two pipelines.

use crate::blacklist::{self, CheckStatus, IpCheckOutcome};
use crate::extractor::{self, ExtractionStatus};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared request-handling configuration. Holds no mutable state; every
/// request builds and discards its own network session.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Base URL of the blacklist-checking site. Overridable for tests.
    pub blacklist_base_url: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            blacklist_base_url: blacklist::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Build the service router with permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/extract", post(extract))
        .route("/check-ips", post(check_ips))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener and serve until shutdown.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, router(state))
        .await
        .context("server error")
}

/// `POST /extract` — fetch a URL and return its readable text.
async fn extract(State(_state): State<AppState>, body: Option<Json<Value>>) -> Response {
    let url = body
        .as_ref()
        .and_then(|payload| payload.get("url"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty());

    let Some(url) = url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "URL required", "status": "failed"})),
        )
            .into_response();
    };

    let result = extractor::extract_text(url).await;
    let code = match result.status {
        ExtractionStatus::Success => StatusCode::OK,
        ExtractionStatus::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(result)).into_response()
}

/// `POST /check-ips` — submit a batch of IPs to the blacklist site.
async fn check_ips(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    let started = Instant::now();

    let Some(Json(payload)) = body else {
        return validation_error("IP list required", started);
    };
    let Some(raw) = payload.get("ips") else {
        return validation_error("IP list required", started);
    };
    let Some(entries) = raw.as_array() else {
        return validation_error("IPs must be provided as an array", started);
    };
    let Some(ips) = entries
        .iter()
        .map(|entry| entry.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
    else {
        return validation_error("IPs must be provided as an array", started);
    };
    if let Err(message) = blacklist::validate_ips(&ips) {
        return validation_error(&message, started);
    }

    let outcome = blacklist::check_ips(&state.blacklist_base_url, &ips).await;
    let code = match outcome.status {
        CheckStatus::Success => StatusCode::OK,
        CheckStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, Json(outcome)).into_response()
}

fn validation_error(message: &str, started: Instant) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(IpCheckOutcome::error(
            message.to_string(),
            started.elapsed(),
        )),
    )
        .into_response()
}

/// `GET /health` — liveness payload.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// `GET /` — static service description.
async fn service_info() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Pagelens API",
        "description": "Text extraction from web pages and bulk IP blacklist checking",
        "endpoints": {
            "/extract": "POST - Extract readable text from a URL",
            "/check-ips": "POST - Check IPs against blacklists",
            "/health": "GET - Service health check",
        },
    }))
}
