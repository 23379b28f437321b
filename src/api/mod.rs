// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod lighting;
pub mod lighting_ws;
pub mod relight;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
pub use lighting::{
    presets_handler, prompt_preview_handler, upload_handler, PresetsResponse,
    PromptPreviewRequest, PromptPreviewResponse, UploadResponse,
};
pub use relight::{relight_handler, RelightRequest, RelightResponse};
