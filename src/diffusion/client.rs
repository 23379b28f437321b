// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Diffusion sidecar client for lighting edits via an OpenAI-compatible API

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::adapter::{AdapterHost, AdapterSpec};
use super::engine::{EditEngine, EditError, EngineOutput, EngineRequest};
use crate::imaging;

/// Base model served by the sidecar
pub const DEFAULT_BASE_MODEL: &str = "Qwen/Qwen-Image-Edit-2509";

/// Client for an image-edit diffusion sidecar
pub struct SidecarClient {
    client: Client,
    endpoint: String,
    model_name: String,
}

// --- OpenAI-compatible response types ---

#[derive(Debug, Deserialize)]
pub struct OpenAIImageResponse {
    pub data: Vec<OpenAIImageData>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAIImageData {
    pub b64_json: Option<String>,
}

impl SidecarClient {
    pub fn new(endpoint: &str, model_name: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "Diffusion sidecar configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Diffusion health check failed: {}", e);
                false
            }
        }
    }

    /// JSON body for `/v1/images/edits`; `None` dimensions are left out
    pub fn edit_body(&self, request: &EngineRequest, base64_image: &str) -> Value {
        let mut body = serde_json::json!({
            "model": self.model_name,
            "image": base64_image,
            "prompt": request.prompt,
            "num_inference_steps": request.num_inference_steps,
            "guidance_scale": request.guidance_scale,
            "seed": request.seed,
            "n": 1,
            "response_format": "b64_json",
        });
        if let Some(height) = request.height {
            body["height"] = serde_json::json!(height);
        }
        if let Some(width) = request.width {
            body["width"] = serde_json::json!(width);
        }
        body
    }

    async fn post_json(&self, path: &str, body: &Value) -> std::result::Result<reqwest::Response, String> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("Diffusion sidecar POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("diffusion sidecar returned {}: {}", status, text));
        }
        Ok(response)
    }
}

#[async_trait]
impl EditEngine for SidecarClient {
    async fn edit(&self, request: &EngineRequest) -> std::result::Result<EngineOutput, EditError> {
        let base64_image = imaging::encode_png_base64(&request.image)?;
        let body = self.edit_body(request, &base64_image);

        let response = self
            .post_json("/v1/images/edits", &body)
            .await
            .map_err(EditError::Engine)?;

        let api_response: OpenAIImageResponse = response
            .json()
            .await
            .map_err(|e| EditError::Engine(format!("invalid sidecar response: {}", e)))?;

        let first = api_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EditError::Engine("empty response from diffusion sidecar".to_string()))?;

        let b64 = first
            .b64_json
            .ok_or_else(|| EditError::Engine("no b64_json in response".to_string()))?;

        let bytes = STANDARD
            .decode(b64.as_bytes())
            .map_err(|e| EditError::Engine(format!("invalid image payload: {}", e)))?;
        let (image, _) = imaging::decode_image_bytes_unbounded(&bytes)
            .map_err(|e| EditError::Engine(format!("undecodable output image: {}", e)))?;

        Ok(EngineOutput { image })
    }
}

#[async_trait]
impl AdapterHost for SidecarClient {
    async fn load_adapter(&self, spec: &AdapterSpec) -> std::result::Result<(), EditError> {
        let body = serde_json::json!({
            "repo": spec.repo,
            "weight_name": spec.weight_name,
            "adapter_name": spec.adapter_name,
        });
        self.post_json("/v1/adapters/load", &body)
            .await
            .map(|_| ())
            .map_err(EditError::AdapterAttach)
    }

    async fn activate_adapters(
        &self,
        names: &[String],
        weights: &[f32],
    ) -> std::result::Result<(), EditError> {
        let body = serde_json::json!({
            "adapter_names": names,
            "adapter_weights": weights,
        });
        self.post_json("/v1/adapters/activate", &body)
            .await
            .map(|_| ())
            .map_err(EditError::AdapterAttach)
    }

    async fn set_attention_processor(&self, processor: &str) -> std::result::Result<(), EditError> {
        let body = serde_json::json!({ "processor": processor });
        self.post_json("/v1/attention/processor", &body)
            .await
            .map(|_| ())
            .map_err(EditError::Engine)
    }
}
