// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! WebSocket transport for the lighting coordinator
//!
//! One connection is one UI session with its own coordinator. Surfaces send
//! intents, the server answers with the pushes for the other surfaces.

pub mod handler;
pub mod messages;

pub use handler::{handle_frame, lighting_ws_handler};
pub use messages::{ErrorCode, ServerMessage};
