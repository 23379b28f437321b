// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Edit engine boundary: request/result types, settings and error taxonomy

use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::imaging::dimensions::floor_to_multiple_of_8;
use crate::imaging::ImageError;
use crate::lighting::LightingAngle;

pub const MIN_GUIDANCE_SCALE: f32 = 1.0;
pub const MAX_GUIDANCE_SCALE: f32 = 10.0;
pub const MIN_INFERENCE_STEPS: u32 = 1;
pub const MAX_INFERENCE_STEPS: u32 = 20;
pub const MIN_DIMENSION: u32 = 256;
pub const MAX_DIMENSION: u32 = 2048;

fn default_randomize_seed() -> bool {
    true
}

fn default_guidance_scale() -> f32 {
    1.0
}

fn default_steps() -> u32 {
    4
}

fn default_dimension() -> u32 {
    1024
}

/// Errors surfaced by an edit request
#[derive(Debug, Error)]
pub enum EditError {
    /// Generate was pressed without an input image
    #[error("Please upload an image first.")]
    MissingImage,

    #[error("Invalid input image: {0}")]
    InvalidImage(#[from] ImageError),

    #[error("Invalid value for {field}: {message}")]
    InvalidSettings { field: &'static str, message: String },

    /// The lighting adapter could not be loaded or activated
    #[error("Lighting adapter could not be attached: {0}")]
    AdapterAttach(String),

    /// Anything failing inside the engine itself
    #[error("Edit engine failed: {0}")]
    Engine(String),
}

/// User-tunable generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSettings {
    #[serde(default)]
    pub seed: u32,
    #[serde(default = "default_randomize_seed")]
    pub randomize_seed: bool,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_steps")]
    pub num_inference_steps: u32,
    /// 0 lets the engine choose
    #[serde(default = "default_dimension")]
    pub height: u32,
    /// 0 lets the engine choose
    #[serde(default = "default_dimension")]
    pub width: u32,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            randomize_seed: default_randomize_seed(),
            guidance_scale: default_guidance_scale(),
            num_inference_steps: default_steps(),
            height: default_dimension(),
            width: default_dimension(),
        }
    }
}

impl EditSettings {
    /// Check ranges and floor non-zero dimensions to a multiple of 8
    pub fn normalized(&self) -> Result<Self, EditError> {
        // The seed is discarded when randomizing
        if !self.randomize_seed && self.seed > super::seed::MAX_SEED {
            return Err(EditError::InvalidSettings {
                field: "seed",
                message: format!("must be at most {}, got {}", super::seed::MAX_SEED, self.seed),
            });
        }
        if !(MIN_GUIDANCE_SCALE..=MAX_GUIDANCE_SCALE).contains(&self.guidance_scale) {
            return Err(EditError::InvalidSettings {
                field: "guidanceScale",
                message: format!(
                    "must be between {} and {}, got {}",
                    MIN_GUIDANCE_SCALE, MAX_GUIDANCE_SCALE, self.guidance_scale
                ),
            });
        }
        if !(MIN_INFERENCE_STEPS..=MAX_INFERENCE_STEPS).contains(&self.num_inference_steps) {
            return Err(EditError::InvalidSettings {
                field: "numInferenceSteps",
                message: format!(
                    "must be between {} and {}, got {}",
                    MIN_INFERENCE_STEPS, MAX_INFERENCE_STEPS, self.num_inference_steps
                ),
            });
        }

        Ok(Self {
            height: normalize_dimension("height", self.height)?,
            width: normalize_dimension("width", self.width)?,
            ..self.clone()
        })
    }
}

fn normalize_dimension(field: &'static str, value: u32) -> Result<u32, EditError> {
    if value == 0 {
        return Ok(0);
    }
    if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
        return Err(EditError::InvalidSettings {
            field,
            message: format!(
                "must be 0 (auto) or between {} and {}, got {}",
                MIN_DIMENSION, MAX_DIMENSION, value
            ),
        });
    }
    Ok(floor_to_multiple_of_8(value))
}

/// One "Generate" press
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub image: Option<DynamicImage>,
    pub angle: LightingAngle,
    pub settings: EditSettings,
}

/// What the engine receives: the prompt is final and the seed resolved
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Always RGB8
    pub image: DynamicImage,
    pub prompt: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub seed: u32,
}

#[derive(Debug, Clone)]
pub struct EngineOutput {
    pub image: DynamicImage,
}

/// Edited image plus what is needed to reproduce it
#[derive(Debug, Clone)]
pub struct EditResult {
    pub image: DynamicImage,
    pub seed: u32,
    pub prompt: String,
    pub processing_time_ms: u64,
}

/// The diffusion editor. One image in, one image out.
#[async_trait]
pub trait EditEngine: Send + Sync {
    async fn edit(&self, request: &EngineRequest) -> Result<EngineOutput, EditError>;
}

/// One-time adapter attachment in front of an [`EditEngine`]
#[async_trait]
pub trait AdapterLifecycle: Send + Sync {
    /// Attach the adapter if that has not happened yet. Cheap once attached.
    async fn ensure_ready(&self) -> Result<(), EditError>;

    fn is_ready(&self) -> bool;
}
