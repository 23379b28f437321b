// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting edit API endpoint module
//!
//! Provides POST /v1/images/relight.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::relight_handler;
pub use request::RelightRequest;
pub use response::RelightResponse;
