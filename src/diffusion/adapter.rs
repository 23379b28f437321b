// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting adapter attachment
//!
//! The adapter is attached once per process. The flag lives behind an async
//! mutex that is taken before the flag is read, so concurrent first requests
//! cannot attach twice. The node normally attaches eagerly at startup and this
//! path only runs lazily when that is disabled or failed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::engine::{AdapterLifecycle, EditError};

pub const DEFAULT_ADAPTER_REPO: &str = "dx8152/Qwen-Edit-2509-Multi-Angle-Lighting";
pub const DEFAULT_ADAPTER_WEIGHTS: &str = "多角度灯光-251116.safetensors";
pub const DEFAULT_ADAPTER_NAME: &str = "multi-angle-lighting";
pub const DEFAULT_ATTENTION_PROCESSOR: &str = "fa3";

/// Where the adapter weights come from and how strongly they apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSpec {
    pub repo: String,
    pub weight_name: String,
    pub adapter_name: String,
    pub weight: f32,
}

impl Default for AdapterSpec {
    fn default() -> Self {
        Self {
            repo: DEFAULT_ADAPTER_REPO.to_string(),
            weight_name: DEFAULT_ADAPTER_WEIGHTS.to_string(),
            adapter_name: DEFAULT_ADAPTER_NAME.to_string(),
            weight: 1.0,
        }
    }
}

/// Adapter management calls exposed by the engine host
#[async_trait]
pub trait AdapterHost: Send + Sync {
    async fn load_adapter(&self, spec: &AdapterSpec) -> Result<(), EditError>;

    async fn activate_adapters(&self, names: &[String], weights: &[f32]) -> Result<(), EditError>;

    async fn set_attention_processor(&self, processor: &str) -> Result<(), EditError>;
}

/// Guards one-time attachment of the lighting adapter
pub struct AdapterGate {
    host: Arc<dyn AdapterHost>,
    spec: AdapterSpec,
    attention_processor: Option<String>,
    attached: Mutex<bool>,
    ready: AtomicBool,
}

impl AdapterGate {
    pub fn new(host: Arc<dyn AdapterHost>, spec: AdapterSpec) -> Self {
        Self {
            host,
            spec,
            attention_processor: None,
            attached: Mutex::new(false),
            ready: AtomicBool::new(false),
        }
    }

    /// Request an alternative attention backend during [`AdapterGate::install_attention_backend`]
    pub fn with_attention_processor(mut self, processor: impl Into<String>) -> Self {
        let processor = processor.into();
        self.attention_processor = if processor.is_empty() {
            None
        } else {
            Some(processor)
        };
        self
    }

    /// Best effort: a failure is logged and the default backend stays in use.
    /// Returns whether the backend was installed.
    pub async fn install_attention_backend(&self) -> bool {
        let Some(processor) = self.attention_processor.as_deref() else {
            return false;
        };
        match self.host.set_attention_processor(processor).await {
            Ok(()) => {
                info!("Attention processor '{}' set successfully", processor);
                true
            }
            Err(e) => {
                warn!(
                    "Could not set attention processor '{}', keeping default: {}",
                    processor, e
                );
                false
            }
        }
    }
}

#[async_trait]
impl AdapterLifecycle for AdapterGate {
    async fn ensure_ready(&self) -> Result<(), EditError> {
        let mut attached = self.attached.lock().await;
        if *attached {
            return Ok(());
        }

        info!(
            "Attaching lighting adapter '{}' from {} ({})",
            self.spec.adapter_name, self.spec.repo, self.spec.weight_name
        );
        self.host.load_adapter(&self.spec).await.map_err(into_attach_error)?;
        self.host
            .activate_adapters(&[self.spec.adapter_name.clone()], &[self.spec.weight])
            .await
            .map_err(into_attach_error)?;

        *attached = true;
        self.ready.store(true, Ordering::Release);
        info!("Lighting adapter '{}' active", self.spec.adapter_name);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn into_attach_error(e: EditError) -> EditError {
    match e {
        EditError::AdapterAttach(_) => e,
        other => EditError::AdapterAttach(other.to_string()),
    }
}
