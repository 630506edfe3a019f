//! Translation configuration: content policy, model alias, token bound

use serde::Deserialize;

use crate::proxy::translation::{ContentNormalizer, DEFAULT_MAX_TOKENS};

/// Settings for the chat-completions request rewrite and models listing
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// How array-valued message content is flattened
    pub content_policy: ContentNormalizer,

    /// Model id the backend understands
    pub canonical_model: String,

    /// Model id clients use for `canonical_model`
    pub model_alias: String,

    /// `max_tokens` applied when the client sends none or an invalid value
    pub default_max_tokens: u64,
}

impl Default for Translation {
    fn default() -> Self {
        Self {
            content_policy: ContentNormalizer::default(),
            canonical_model: "anthropic-claude-opus-4.5".to_string(),
            model_alias: "do-opus-4.5".to_string(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Translation config as loaded from file
#[derive(Debug, Deserialize, Default)]
pub struct FileTranslation {
    pub content_policy: Option<String>,
    pub canonical_model: Option<String>,
    pub model_alias: Option<String>,
    pub default_max_tokens: Option<u64>,
}

impl Translation {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileTranslation>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            content_policy: file
                .content_policy
                .map(|s| parse_content_policy(&s))
                .unwrap_or(defaults.content_policy),
            canonical_model: file.canonical_model.unwrap_or(defaults.canonical_model),
            model_alias: file.model_alias.unwrap_or(defaults.model_alias),
            default_max_tokens: file
                .default_max_tokens
                .filter(|n| *n >= 1)
                .unwrap_or(defaults.default_max_tokens),
        }
    }
}

/// Parse a content policy name, falling back to the default for unknown names
pub(crate) fn parse_content_policy(s: &str) -> ContentNormalizer {
    ContentNormalizer::parse(s).unwrap_or_else(|| {
        let fallback = ContentNormalizer::default();
        eprintln!(
            "Warning: unknown content_policy {:?}, using {:?} (expected drop-tool-use, render-tool-use or tool-calls)",
            s,
            fallback.as_str()
        );
        fallback
    })
}
