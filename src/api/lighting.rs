// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting prompt preview, bucket presets and image upload endpoints

use axum::Json;
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::errors::ApiError;
use crate::imaging::{self, derive_edit_dimensions};
use crate::lighting::{
    AzimuthBucket, ElevationBucket, LightingAngle, AZIMUTH_SLIDER, ELEVATION_SLIDER,
};

/// Multipart field carrying the uploaded image
pub const UPLOAD_FIELD: &str = "image";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreviewRequest {
    #[serde(default)]
    pub azimuth: f64,
    #[serde(default)]
    pub elevation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreviewResponse {
    pub prompt: String,
    /// Bucketed azimuth in degrees
    pub azimuth: f64,
    /// Bucketed elevation in degrees
    pub elevation: f64,
    pub azimuth_label: String,
    pub elevation_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub degrees: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderDomain {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl From<(f64, f64, f64)> for SliderDomain {
    fn from((min, max, step): (f64, f64, f64)) -> Self {
        Self { min, max, step }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetsResponse {
    pub azimuths: Vec<BucketInfo>,
    pub elevations: Vec<BucketInfo>,
    pub azimuth_slider: SliderDomain,
    pub elevation_slider: SliderDomain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Default edit width derived from the upload
    pub width: u32,
    /// Default edit height derived from the upload
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
    /// PNG data URL for the lighting widget's reference image
    pub image_url: String,
}

/// POST /v1/lighting/prompt - Prompt for an angle pair, with its buckets
pub async fn prompt_preview_handler(
    Json(request): Json<PromptPreviewRequest>,
) -> Json<PromptPreviewResponse> {
    let quantized = LightingAngle::new(request.azimuth, request.elevation).quantize();
    let degrees = quantized.to_angle();

    Json(PromptPreviewResponse {
        prompt: quantized.prompt().into_string(),
        azimuth: degrees.azimuth,
        elevation: degrees.elevation,
        azimuth_label: quantized.azimuth.label().to_string(),
        elevation_label: quantized.elevation.label().to_string(),
    })
}

/// GET /v1/lighting/presets - Bucket grids and slider domains
pub async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        azimuths: AzimuthBucket::ALL
            .iter()
            .map(|b| BucketInfo {
                degrees: b.degrees(),
                label: b.label().to_string(),
            })
            .collect(),
        elevations: ElevationBucket::ALL
            .iter()
            .map(|b| BucketInfo {
                degrees: b.degrees(),
                label: b.label().to_string(),
            })
            .collect(),
        azimuth_slider: AZIMUTH_SLIDER.into(),
        elevation_slider: ELEVATION_SLIDER.into(),
    })
}

/// POST /v1/images/upload - Default edit size and widget data URL for an upload
pub async fn upload_handler(mut multipart: Multipart) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("failed to read upload: {}", e)))?;

        let (image, info) = imaging::decode_image_bytes(&bytes).map_err(|e| {
            warn!("Upload rejected: {}", e);
            ApiError::from(e)
        })?;
        let dims = derive_edit_dimensions(info.width, info.height);
        let image_url = imaging::to_data_url(&image)?;

        info!(
            "Image uploaded: {}x{} -> default edit size {}x{}",
            info.width, info.height, dims.width, dims.height
        );

        return Ok(Json(UploadResponse {
            width: dims.width,
            height: dims.height,
            original_width: info.width,
            original_height: info.height,
            image_url,
        }));
    }

    Err(ApiError::InvalidRequest(format!(
        "multipart field '{}' is required",
        UPLOAD_FIELD
    )))
}
