// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting edit response types

use serde::{Deserialize, Serialize};

/// Response from a lighting edit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelightResponse {
    /// Base64-encoded PNG of the edited image
    pub image: String,
    /// Seed actually used; resubmit it with randomization off to reproduce
    pub seed: u32,
    /// Prompt sent to the engine
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub processing_time_ms: u64,
}
