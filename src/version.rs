// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Relight Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-lighting-control-2025-11-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Build date
pub const BUILD_DATE: &str = "2025-11-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "lighting-prompts",
    "azimuth-elevation-buckets",
    "lighting-sync-websocket",
    "multi-angle-lighting-adapter",
    "seed-reproducibility",
    "upload-dimension-derivation",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Relight Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "version": VERSION_NUMBER,
        "build": VERSION,
        "date": BUILD_DATE,
        "features": FEATURES,
    })
}
