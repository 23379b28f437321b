// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::lighting::{presets_handler, prompt_preview_handler, upload_handler};
use super::lighting_ws::lighting_ws_handler;
use super::relight::relight_handler;
use crate::diffusion::RelightService;
use crate::imaging::MAX_IMAGE_SIZE;

/// Base64 inflates uploads by 4/3; leave headroom for the JSON envelope
pub const MAX_BODY_BYTES: usize = MAX_IMAGE_SIZE * 2;

#[derive(Clone)]
pub struct AppState {
    pub relight: Option<RelightService>,
}

impl AppState {
    pub fn new(relight: RelightService) -> Self {
        Self {
            relight: Some(relight),
        }
    }

    /// State without an engine: lighting routes work, edits return 503
    pub fn new_for_test() -> Self {
        Self { relight: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    /// Version number, build tag, date and feature list
    pub version: serde_json::Value,
    pub engine_configured: bool,
    pub adapter_ready: bool,
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/lighting/prompt", post(prompt_preview_handler))
        .route("/v1/lighting/presets", get(presets_handler))
        .route("/v1/lighting/ws", get(lighting_ws_handler))
        .route("/v1/images/upload", post(upload_handler))
        .route("/v1/images/relight", post(relight_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    addr: SocketAddr,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let adapter_ready = state
        .relight
        .as_ref()
        .map(RelightService::adapters_ready)
        .unwrap_or(false);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::version::get_version_info(),
        engine_configured: state.relight.is_some(),
        adapter_ready,
    })
}
