// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting edits via a diffusion sidecar with a one-time lighting adapter

pub mod adapter;
pub mod client;
pub mod engine;
pub mod seed;
pub mod service;

pub use adapter::{AdapterGate, AdapterHost, AdapterSpec};
pub use client::SidecarClient;
pub use engine::{
    AdapterLifecycle, EditEngine, EditError, EditRequest, EditResult, EditSettings,
    EngineOutput, EngineRequest,
};
pub use seed::{resolve_seed, MAX_SEED};
pub use service::RelightService;
