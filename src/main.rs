// toolbridge - Translating proxy for OpenAI-compatible inference backends
//
// Clients speaking the Anthropic-style chat dialect (content blocks,
// tool_use, Anthropic tool declarations) talk to this proxy; it rewrites each
// chat-completions request into the OpenAI-compatible shape, forwards it, and
// relays the reply (streamed or buffered).
//
// Architecture:
// - Proxy server (axum): Receives /v1/* and forwards to the backend (reqwest)
// - Translation: Pure JSON rewrites of requests and the models listing
// - Config: CLI flags > env > ~/.config/toolbridge/config.toml > defaults

mod cli;
mod config;
mod logging;
mod proxy;
mod startup;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Handle CLI commands first (config --show, --reset, --path)
    if cli::handle_cli(&cli)? {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    // Keep the guard alive for the whole run so file logs flush
    let _file_guard = logging::init_tracing(&config.logging);

    startup::print_startup(&config);
    startup::log_startup(&config);

    // Oneshot channel for graceful proxy shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let proxy_config = config.clone();
    let mut proxy_handle =
        tokio::spawn(async move { proxy::start_proxy(proxy_config, shutdown_rx).await });

    tokio::select! {
        // Proxy exited on its own (bind failure, server error)
        result = &mut proxy_handle => {
            return result.context("Proxy task failed")?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
        }
    }

    tracing::info!("Shutting down...");

    // If the send fails, the proxy has already shut down (which is fine)
    let _ = shutdown_tx.send(());
    proxy_handle.await.context("Proxy task failed")??;

    tracing::info!("Shutdown complete");
    Ok(())
}
