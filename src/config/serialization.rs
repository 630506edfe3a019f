//! Config serialization to TOML
//!
//! Single source of truth for the config file format: the first-run template
//! and `config --reset` both come from `Config::to_toml()`.

use super::Config;

impl Config {
    /// Serialize config to a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# toolbridge configuration
#
# Environment variables override these values:
#   TOOLBRIDGE_BIND, TOOLBRIDGE_BACKEND_URL, TOOLBRIDGE_TIMEOUT_SECS,
#   TOOLBRIDGE_CONTENT_POLICY, RUST_LOG

# Proxy bind address
bind_addr = {bind}

# OpenAI-compatible backend; /v1/{{path}} is forwarded to {{backend_url}}/{{path}}
backend_url = {backend}

# Seconds allowed for connecting and receiving response headers
timeout_secs = {timeout}

# Maximum chunk size (bytes) when relaying streamed responses
stream_chunk_size = {chunk}

# ─────────────────────────────────────────────────────────────────────────────
# TRANSLATION (chat/completions request rewrite, models listing rewrite)
# ─────────────────────────────────────────────────────────────────────────────
# content_policy controls how array-valued message content is flattened:
#   drop-tool-use    text blocks joined with " ", tool_use blocks dropped
#   render-tool-use  text blocks joined with blank lines, tool_use rendered inline
#   tool-calls       text joined with newlines, tool_use moved to tool_calls
[translation]
content_policy = {policy}
canonical_model = {canonical}
model_alias = {alias}
default_max_tokens = {max_tokens}

# Logging configuration (RUST_LOG env var overrides level)
[logging]
level = {log_level}
# JSON file logging in addition to stdout
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = {log_file_rotation}  # hourly, daily, never
file_prefix = {log_file_prefix}
"#,
            bind = toml_string(&self.bind_addr.to_string()),
            backend = toml_string(&self.backend_url),
            timeout = self.timeout_secs,
            chunk = self.stream_chunk_size,
            policy = toml_string(self.translation.content_policy.as_str()),
            canonical = toml_string(&self.translation.canonical_model),
            alias = toml_string(&self.translation.model_alias),
            max_tokens = self.translation.default_max_tokens,
            log_level = toml_string(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_string(&self.logging.file_dir.display().to_string()),
            log_file_rotation = toml_string(self.logging.file_rotation.as_str()),
            log_file_prefix = toml_string(&self.logging.file_prefix),
        )
    }
}

/// Quote and escape a TOML basic string
fn toml_string(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}
