// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration: optional TOML file, then environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::diffusion::adapter::{AdapterSpec, DEFAULT_ATTENTION_PROCESSOR};
use crate::diffusion::client::DEFAULT_BASE_MODEL;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "RELIGHT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8082".to_string(),
            model: DEFAULT_BASE_MODEL.to_string(),
            timeout_secs: 300,
        }
    }
}

impl EngineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    #[serde(flatten)]
    pub spec: AdapterSpec,
    /// Empty disables the optional attention backend
    pub attention_processor: String,
    /// Attach at startup instead of on the first edit
    pub eager_attach: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            spec: AdapterSpec::default(),
            attention_processor: DEFAULT_ATTENTION_PROCESSOR.to_string(),
            eager_attach: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub node: ServerConfig,
    pub engine: EngineConfig,
    pub adapter: AdapterConfig,
}

impl NodeConfig {
    /// Load `.env`, the file named by `RELIGHT_CONFIG` (if any), then env overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from `lookup`; unparsable numbers keep the current value
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("API_HOST") {
            self.node.host = val;
        }
        if let Some(num) = lookup("API_PORT").and_then(|v| v.parse().ok()) {
            self.node.port = num;
        }
        if let Some(val) = lookup("DIFFUSION_ENDPOINT") {
            self.engine.endpoint = val;
        }
        if let Some(val) = lookup("DIFFUSION_MODEL") {
            self.engine.model = val;
        }
        if let Some(num) = lookup("DIFFUSION_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.engine.timeout_secs = num;
        }
        if let Some(val) = lookup("LIGHTING_ADAPTER_REPO") {
            self.adapter.spec.repo = val;
        }
        if let Some(val) = lookup("LIGHTING_ADAPTER_WEIGHTS") {
            self.adapter.spec.weight_name = val;
        }
        if let Some(val) = lookup("LIGHTING_ADAPTER_NAME") {
            self.adapter.spec.adapter_name = val;
        }
        if let Some(val) = lookup("ATTENTION_PROCESSOR") {
            self.adapter.attention_processor = val;
        }
        if let Some(val) = lookup("EAGER_ADAPTER_ATTACH") {
            self.adapter.eager_attach = val.to_lowercase() == "true" || val == "1";
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.node.host, self.node.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.node.host, self.node.port))
    }
}
