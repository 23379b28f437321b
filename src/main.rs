// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use fabstir_relight_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    diffusion::{AdapterGate, AdapterLifecycle, RelightService, SidecarClient},
    version,
};
use std::{env, sync::Arc};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());

    let config = NodeConfig::load()?;
    let addr = config.listen_addr()?;

    let client = Arc::new(SidecarClient::new(
        &config.engine.endpoint,
        &config.engine.model,
        config.engine.timeout(),
    )?);
    if !client.health_check().await {
        warn!(
            "Diffusion sidecar at {} is not healthy yet; edits will fail until it is",
            client.endpoint()
        );
    }

    let gate = Arc::new(
        AdapterGate::new(client.clone(), config.adapter.spec.clone())
            .with_attention_processor(config.adapter.attention_processor.clone()),
    );
    gate.install_attention_backend().await;

    // Attach once before serving so concurrent first requests never race
    if config.adapter.eager_attach {
        gate.ensure_ready()
            .await
            .context("failed to attach lighting adapter")?;
    } else {
        info!("Lighting adapter will be attached on the first edit");
    }

    let service = RelightService::new(client, gate);
    let state = Arc::new(AppState::new(service));

    start_server(addr, state, shutdown_signal()).await?;

    info!("Relight node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
