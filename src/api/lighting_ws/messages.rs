// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::lighting::{LightingIntent, LightingSnapshot, SurfaceUpdate};

/// Error codes for lighting WebSocket messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedMessage,
    UnsupportedMessage,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::MalformedMessage => write!(f, "MALFORMED_MESSAGE"),
            ErrorCode::UnsupportedMessage => write!(f, "UNSUPPORTED_MESSAGE"),
        }
    }
}

/// Server to client frames
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SessionReady {
        #[serde(rename = "sessionId")]
        session_id: String,
        state: LightingSnapshot,
    },
    SurfaceUpdates {
        updates: Vec<SurfaceUpdate>,
    },
    State {
        state: LightingSnapshot,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMessage {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code,
            message: message.into(),
        }
    }
}

/// `type` tags of [`LightingIntent`] frames
const INTENT_TYPES: &[&str] = &[
    "widget_change",
    "slider_change",
    "slider_release",
    "image_upload",
    "image_clear",
];

/// Client to server frames: an intent, or a request for the current state
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Intent(LightingIntent),
    Snapshot,
}

impl ClientMessage {
    /// Unknown types are `UNSUPPORTED_MESSAGE`; known types with a bad
    /// payload, bad JSON or a missing type are `MALFORMED_MESSAGE`.
    pub fn parse(text: &str) -> Result<Self, ServerMessage> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            ServerMessage::error(ErrorCode::MalformedMessage, format!("invalid JSON: {}", e))
        })?;

        let kind = match value.get("type").and_then(Value::as_str) {
            Some(kind) => kind.to_string(),
            None => {
                return Err(ServerMessage::error(
                    ErrorCode::MalformedMessage,
                    "missing message type",
                ))
            }
        };

        if kind == "snapshot" {
            return Ok(ClientMessage::Snapshot);
        }
        if !INTENT_TYPES.contains(&kind.as_str()) {
            return Err(ServerMessage::error(
                ErrorCode::UnsupportedMessage,
                format!("unknown message type '{}'", kind),
            ));
        }

        serde_json::from_value::<LightingIntent>(value)
            .map(ClientMessage::Intent)
            .map_err(|e| {
                ServerMessage::error(
                    ErrorCode::MalformedMessage,
                    format!("invalid '{}' payload: {}", kind, e),
                )
            })
    }
}
