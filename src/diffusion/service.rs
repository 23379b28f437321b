// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Relight service: turns a lighting angle and an image into an edited image

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::engine::{
    AdapterLifecycle, EditEngine, EditError, EditRequest, EditResult, EngineRequest,
};
use super::seed::resolve_seed;

/// Composes adapter readiness, prompt building, seeding and the engine call
#[derive(Clone)]
pub struct RelightService {
    engine: Arc<dyn EditEngine>,
    adapters: Arc<dyn AdapterLifecycle>,
}

impl RelightService {
    pub fn new(engine: Arc<dyn EditEngine>, adapters: Arc<dyn AdapterLifecycle>) -> Self {
        Self { engine, adapters }
    }

    pub fn adapters_ready(&self) -> bool {
        self.adapters.is_ready()
    }

    /// Run one edit.
    ///
    /// Pipeline:
    /// 1. Reject a missing image before any side effect
    /// 2. Validate settings (dimensions floored to multiples of 8)
    /// 3. Make sure the lighting adapter is attached
    /// 4. Build the prompt from the quantized angle
    /// 5. Resolve the seed (random or passed through)
    /// 6. Call the engine with an RGB-normalized image
    pub async fn edit(&self, request: EditRequest) -> Result<EditResult, EditError> {
        let image = request.image.ok_or_else(|| {
            warn!("Edit rejected: no image supplied");
            EditError::MissingImage
        })?;
        let settings = request.settings.normalized()?;

        self.adapters.ensure_ready().await?;

        let prompt = request.angle.prompt().into_string();
        info!("Generated Prompt: {}", prompt);

        let seed = resolve_seed(
            settings.seed,
            settings.randomize_seed,
            &mut rand::thread_rng(),
        );
        debug!(
            "Edit settings: seed={}, randomized={}, steps={}, guidance={}, size={}x{}",
            seed,
            settings.randomize_seed,
            settings.num_inference_steps,
            settings.guidance_scale,
            settings.width,
            settings.height
        );

        let engine_request = EngineRequest {
            image: DynamicImage::ImageRgb8(image.to_rgb8()),
            prompt: prompt.clone(),
            height: non_zero(settings.height),
            width: non_zero(settings.width),
            num_inference_steps: settings.num_inference_steps,
            guidance_scale: settings.guidance_scale,
            seed,
        };

        let start = Instant::now();
        let output = self.engine.edit(&engine_request).await.map_err(|e| {
            warn!("Lighting edit failed: {}", e);
            e
        })?;
        let processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Lighting edit complete: prompt='{}', seed={}, {}x{}, {}ms",
            prompt,
            seed,
            output.image.width(),
            output.image.height(),
            processing_time_ms
        );

        Ok(EditResult {
            image: output.image,
            seed,
            prompt,
            processing_time_ms,
        })
    }
}

fn non_zero(value: u32) -> Option<u32> {
    (value != 0).then_some(value)
}
