// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use image::ImageFormat;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::diffusion::adapter::{
    DEFAULT_ADAPTER_NAME, DEFAULT_ADAPTER_REPO, DEFAULT_ADAPTER_WEIGHTS, DEFAULT_ATTENTION_PROCESSOR,
};
use crate::diffusion::client::DEFAULT_BASE_MODEL;
use crate::diffusion::engine::MIN_DIMENSION;
use crate::diffusion::{
    AdapterGate, AdapterSpec, EditRequest, EditSettings, RelightService, SidecarClient,
};
use crate::imaging::{self, derive_edit_dimensions, EditDimensions};
use crate::lighting::{LightingAngle, LightingPrompt};

/// Arguments for the prompt command
#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Horizontal angle in degrees (0=front, 90=right, 180=rear, 270=left)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub azimuth: f64,

    /// Vertical angle in degrees (-90=below, 0=level, 90=above)
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub elevation: f64,
}

/// Arguments for the dimensions command
#[derive(Args, Debug)]
pub struct DimensionsArgs {
    /// Image file to inspect
    #[arg(long)]
    pub image: PathBuf,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Input image file
    #[arg(long)]
    pub image: PathBuf,

    /// Where to write the edited PNG
    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub azimuth: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub elevation: f64,

    /// Fixed seed; when omitted a random seed is drawn and printed
    #[arg(long)]
    pub seed: Option<u32>,

    #[arg(long, default_value_t = 1.0)]
    pub guidance_scale: f32,

    #[arg(long, default_value_t = 4)]
    pub steps: u32,

    /// Output width (0 = engine default); derived from the image when omitted
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height (0 = engine default); derived from the image when omitted
    #[arg(long)]
    pub height: Option<u32>,

    /// Diffusion sidecar URL
    #[arg(long, env = "DIFFUSION_ENDPOINT", default_value = "http://localhost:8082")]
    pub endpoint: String,

    #[arg(long, env = "DIFFUSION_MODEL", default_value = DEFAULT_BASE_MODEL)]
    pub model: String,

    /// Attention processor to request; empty to skip
    #[arg(long, env = "ATTENTION_PROCESSOR", default_value = DEFAULT_ATTENTION_PROCESSOR)]
    pub attention_processor: String,

    /// Hugging Face repository holding the lighting adapter
    #[arg(long, env = "LIGHTING_ADAPTER_REPO", default_value = DEFAULT_ADAPTER_REPO)]
    pub adapter_repo: String,

    #[arg(long, env = "LIGHTING_ADAPTER_WEIGHTS", default_value = DEFAULT_ADAPTER_WEIGHTS)]
    pub adapter_weights: String,

    #[arg(long, env = "LIGHTING_ADAPTER_NAME", default_value = DEFAULT_ADAPTER_NAME)]
    pub adapter_name: String,

    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
}

/// Outcome of a CLI edit
#[derive(Debug, Clone)]
pub struct EditSummary {
    pub output: PathBuf,
    pub seed: u32,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

pub fn prompt(args: &PromptArgs) -> LightingPrompt {
    LightingAngle::new(args.azimuth, args.elevation).prompt()
}

pub fn dimensions(args: &DimensionsArgs) -> Result<EditDimensions> {
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let (_, info) = imaging::decode_image_bytes(&bytes)?;
    Ok(derive_edit_dimensions(info.width, info.height))
}

impl EditArgs {
    pub fn adapter_spec(&self) -> AdapterSpec {
        AdapterSpec {
            repo: self.adapter_repo.clone(),
            weight_name: self.adapter_weights.clone(),
            adapter_name: self.adapter_name.clone(),
            ..AdapterSpec::default()
        }
    }

    /// Settings for the service; missing dimensions come from the image size
    pub fn settings(&self, derived: EditDimensions) -> EditSettings {
        EditSettings {
            seed: self.seed.unwrap_or(0),
            randomize_seed: self.seed.is_none(),
            guidance_scale: self.guidance_scale,
            num_inference_steps: self.steps,
            height: self.height.unwrap_or(engine_side(derived.height)),
            width: self.width.unwrap_or(engine_side(derived.width)),
        }
    }
}

/// Derived sides too small for the engine fall back to its default
fn engine_side(value: u32) -> u32 {
    if value < MIN_DIMENSION {
        0
    } else {
        value
    }
}

pub async fn edit(args: &EditArgs) -> Result<EditSummary> {
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("failed to read {}", args.image.display()))?;
    let (image, info) = imaging::decode_image_bytes(&bytes)?;
    let settings = args.settings(derive_edit_dimensions(info.width, info.height));

    let client = Arc::new(SidecarClient::new(
        &args.endpoint,
        &args.model,
        Duration::from_secs(args.timeout_secs),
    )?);
    let gate = AdapterGate::new(client.clone(), args.adapter_spec())
        .with_attention_processor(args.attention_processor.clone());
    gate.install_attention_backend().await;
    let service = RelightService::new(client, Arc::new(gate));

    let result = service
        .edit(EditRequest {
            image: Some(image),
            angle: LightingAngle::new(args.azimuth, args.elevation),
            settings,
        })
        .await?;

    result
        .image
        .save_with_format(&args.output, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());

    Ok(EditSummary {
        output: args.output.clone(),
        seed: result.seed,
        prompt: result.prompt,
        width: result.image.width(),
        height: result.image.height(),
    })
}
