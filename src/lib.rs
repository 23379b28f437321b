// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod diffusion;
pub mod imaging;
pub mod lighting;
pub mod version;

pub use config::NodeConfig;
pub use diffusion::{
    AdapterGate, AdapterLifecycle, EditEngine, EditError, EditRequest, EditResult, EditSettings,
    RelightService, SidecarClient,
};
pub use lighting::{build_lighting_prompt, LightingAngle, LightingCoordinator, LightingPrompt};
