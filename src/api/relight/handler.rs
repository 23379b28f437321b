// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting edit endpoint handler

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{debug, warn};

use super::request::RelightRequest;
use super::response::RelightResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::imaging;

/// POST /v1/images/relight - Apply a lighting direction to an image
///
/// Pipeline:
/// 1. Get the RelightService from AppState (503 if absent)
/// 2. Decode the input image (400 if undecodable)
/// 3. Run the edit: missing image 400, adapter 503, engine 502
/// 4. Encode the output as PNG and return it with seed and prompt
pub async fn relight_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RelightRequest>,
) -> Result<Json<RelightResponse>, ApiError> {
    debug!(
        "Relight request received: azimuth={}, elevation={}, has_image={}",
        request.azimuth,
        request.elevation,
        request.image.is_some()
    );

    let service = state.relight.as_ref().ok_or_else(|| {
        warn!("Relight service not available");
        ApiError::ServiceUnavailable("Edit engine not available".to_string())
    })?;

    let edit_request = request.into_edit_request()?;
    let result = service.edit(edit_request).await?;

    let image = imaging::encode_png_base64(&result.image)?;

    Ok(Json(RelightResponse {
        image,
        seed: result.seed,
        prompt: result.prompt,
        width: result.image.width(),
        height: result.image.height(),
        processing_time_ms: result.processing_time_ms,
    }))
}
