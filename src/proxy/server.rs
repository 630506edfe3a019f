//! Proxy server setup and initialization

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::config::Config;

use super::proxy_handler;
use super::state::ProxyState;
use super::translation::TranslationPipeline;

/// Start the proxy server
pub async fn start_proxy(
    config: Config,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> Result<()> {
    let bind_addr = config.bind_addr;
    let state = build_state(&config)?;

    tracing::info!(
        "Translation: policy={}, alias {} -> {}",
        state.translation.content_policy().as_str(),
        state.translation.alias().alias(),
        state.translation.alias().canonical()
    );

    let app = build_router(state);

    tracing::info!("Starting proxy on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", bind_addr))?;

    tracing::info!("Proxy listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_rx.await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Proxy server shut down gracefully");
    Ok(())
}

/// Build the shared proxy state (HTTP client + translation pipeline) from config
fn build_state(config: &Config) -> Result<ProxyState> {
    let timeout = Duration::from_secs(config.timeout_secs);

    // No total request timeout on the client: streamed bodies may legitimately
    // outlive the budget. The handler bounds connect + headers instead.
    let client = reqwest::Client::builder()
        .connect_timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .context("Failed to create HTTP client")?;

    Ok(ProxyState::new(
        client,
        config.backend_url.clone(),
        timeout,
        config.stream_chunk_size,
        TranslationPipeline::from_config(&config.translation),
    ))
}

/// Router: `/v1/{path}` for GET and POST, everything else is 404/405
pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/v1/*path", get(proxy_handler).post(proxy_handler))
        .with_state(state)
}
