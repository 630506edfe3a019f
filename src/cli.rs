// CLI module - command-line argument parsing and handlers
//
// Flags on the bare command override the loaded configuration. The config
// subcommand manages the config file:
// - config --show: Display effective configuration
// - config --path: Print config file path
// - config --reset: Regenerate config file with defaults

use std::io::Write;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{normalize_backend_url, Config, VERSION};
use crate::proxy::translation::ContentNormalizer;

/// toolbridge - Anthropic-style to OpenAI-compatible translating proxy
#[derive(Parser, Debug)]
#[command(name = "toolbridge")]
#[command(version = VERSION)]
#[command(about = "Translating proxy for OpenAI-compatible inference backends", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Address to listen on (overrides TOOLBRIDGE_BIND and the config file)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Backend base URL (overrides TOOLBRIDGE_BACKEND_URL and the config file)
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Content policy: drop-tool-use, render-tool-use or tool-calls
    #[arg(long, value_name = "POLICY", value_parser = parse_policy)]
    pub content_policy: Option<ContentNormalizer>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn parse_policy(s: &str) -> Result<ContentNormalizer, String> {
    ContentNormalizer::parse(s).ok_or_else(|| {
        format!(
            "unknown content policy {:?} (expected drop-tool-use, render-tool-use or tool-calls)",
            s
        )
    })
}

impl Cli {
    /// Apply command-line overrides on top of env/file/default configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = normalize_backend_url(url);
        }
        if let Some(policy) = self.content_policy {
            config.translation.content_policy = policy;
        }
    }
}

/// Handle CLI subcommands. Returns true if a command was handled (exit after).
pub fn handle_cli(cli: &Cli) -> Result<bool> {
    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path()?;
            } else if show {
                handle_config_show(cli)?;
            } else if reset {
                handle_config_reset()?;
            } else {
                // No flag provided, show help
                println!("Usage: toolbridge config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(true)
        }
        None => Ok(false), // No subcommand, run normal proxy
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(cli: &Cli) -> Result<()> {
    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    println!("# Effective configuration (flags > env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    // Confirm if file exists
    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush()?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read confirmation")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}
