// Startup module - displays banner and effective settings
//
// Printed once before the proxy starts serving, mirrored to the log so file
// logs record what the process ran with.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// One labelled line of the banner
struct Setting {
    label: &'static str,
    value: String,
}

fn settings(config: &Config) -> Vec<Setting> {
    let translation = &config.translation;
    vec![
        Setting {
            label: "backend",
            value: config.backend_url.clone(),
        },
        Setting {
            label: "alias",
            value: format!(
                "{} -> {}",
                translation.model_alias, translation.canonical_model
            ),
        },
        Setting {
            label: "content",
            value: translation.content_policy.as_str().to_string(),
        },
        Setting {
            label: "max_tokens",
            value: format!("{} (default)", translation.default_max_tokens),
        },
        Setting {
            label: "timeout",
            value: format!("{}s", config.timeout_secs),
        },
    ]
}

/// Print the startup banner
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}toolbridge{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}Translating proxy for OpenAI-compatible backends{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for setting in settings(config) {
        println!("    {DIM}{:<12}{RESET} {}", setting.label, setting.value);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Proxy listening on {BOLD}http://{}/v1{RESET}",
        config.bind_addr
    );
    println!();
}

/// Record the effective settings in the log
pub fn log_startup(config: &Config) {
    tracing::info!("toolbridge v{}", VERSION);
    for setting in settings(config) {
        tracing::info!("  {} = {}", setting.label, setting.value);
    }
    tracing::info!("▸ Listening on {}", config.bind_addr);
}
