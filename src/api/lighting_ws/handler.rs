// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, info};
use uuid::Uuid;

use super::messages::{ClientMessage, ServerMessage};
use crate::lighting::LightingCoordinator;

/// GET /v1/lighting/ws
pub async fn lighting_ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(mut socket: WebSocket) {
    let session_id = Uuid::new_v4().to_string();
    let mut coordinator = LightingCoordinator::new();
    info!("Lighting session {} opened", session_id);

    let ready = ServerMessage::SessionReady {
        session_id: session_id.clone(),
        state: coordinator.snapshot(),
    };
    if send(&mut socket, &ready).await.is_err() {
        return;
    }

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_frame(&mut coordinator, &text) {
                    if send(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                if socket.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!("Lighting session {} receive error: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    info!("Lighting session {} closed", session_id);
}

/// Process one text frame. `None` means nothing needs to be sent, which is
/// the case for echoes that leave the canonical state unchanged.
pub fn handle_frame(coordinator: &mut LightingCoordinator, text: &str) -> Option<ServerMessage> {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Snapshot) => Some(ServerMessage::State {
            state: coordinator.snapshot(),
        }),
        Ok(ClientMessage::Intent(intent)) => {
            let updates = coordinator.apply(intent);
            if updates.is_empty() {
                None
            } else {
                Some(ServerMessage::SurfaceUpdates { updates })
            }
        }
        Err(error) => Some(error),
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).unwrap_or_default();
    socket.send(Message::Text(text)).await
}
