//! Request/response translation between the Anthropic-style client dialect and
//! an OpenAI-compatible backend.
//!
//! # Architecture
//!
//! ```text
//! Client Request (chat/completions, Anthropic-style content)
//!     ↓
//! TranslationPipeline::translate_chat_request
//!     ├─ ModelAlias           alias → canonical backend id
//!     ├─ ContentNormalizer    content blocks → string (+ tool_calls)
//!     ├─ normalize_tool_choice
//!     ├─ normalize_tools      4 tool shapes → function tools
//!     └─ validate_max_tokens
//!     ↓
//! [Forwarded to backend]
//!     ↓
//! TranslationPipeline::translate_models_listing   (models only)
//!     ↓
//! Client Response
//! ```
//!
//! Every transform is a pure function over `serde_json::Value`: unknown fields
//! pass through and malformed shapes degrade to safe defaults instead of
//! failing the request.

mod alias;
mod content;
mod max_tokens;
mod tool_choice;
mod tools;

pub use alias::{normalize_model_id, ModelAlias};
pub use content::ContentNormalizer;
pub use max_tokens::{validate_max_tokens, DEFAULT_MAX_TOKENS};
pub use tool_choice::normalize_tool_choice;
pub use tools::normalize_tools;

pub(crate) use tools::is_truthy;

use serde_json::Value;

// ============================================================================
// Endpoint
// ============================================================================

/// Backend endpoints that get special treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `chat/completions` - request body is normalized
    ChatCompletions,
    /// `models` - successful listing is alias-rewritten
    Models,
    /// Everything else is relayed untouched
    Other,
}

impl Endpoint {
    /// Classify a path relative to `/v1/` (leading slashes already stripped)
    pub fn from_path(path: &str) -> Self {
        match path {
            "chat/completions" => Endpoint::ChatCompletions,
            "models" => Endpoint::Models,
            _ => Endpoint::Other,
        }
    }
}

// ============================================================================
// Translation Pipeline
// ============================================================================

/// Immutable bundle of the per-request transforms, built once from config
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    content: ContentNormalizer,
    alias: ModelAlias,
    default_max_tokens: u64,
}

impl TranslationPipeline {
    pub fn new(content: ContentNormalizer, alias: ModelAlias, default_max_tokens: u64) -> Self {
        Self {
            content,
            alias,
            default_max_tokens,
        }
    }

    /// Create pipeline from configuration
    pub fn from_config(config: &crate::config::Translation) -> Self {
        Self::new(
            config.content_policy,
            ModelAlias::new(
                config.canonical_model.clone(),
                config.model_alias.clone(),
            ),
            config.default_max_tokens,
        )
    }

    pub fn content_policy(&self) -> ContentNormalizer {
        self.content
    }

    pub fn alias(&self) -> &ModelAlias {
        &self.alias
    }

    /// Rewrite a chat-completions request body into the backend shape.
    ///
    /// Non-object bodies are returned unchanged. Fields the pipeline does not
    /// know about are preserved.
    pub fn translate_chat_request(&self, body: Value) -> Value {
        let Value::Object(mut request) = body else {
            return body;
        };

        if let Some(Value::String(model)) = request.get("model") {
            if let Some(canonical) = self.alias.to_backend(model) {
                tracing::debug!("Model alias: {} -> {}", model, canonical);
                request.insert("model".to_string(), Value::String(canonical.to_string()));
            }
        }

        if let Some(messages) = request.get("messages") {
            let normalized = self.content.normalize_messages(messages);
            request.insert("messages".to_string(), normalized);
        }

        if let Some(choice) = request.get("tool_choice") {
            let normalized = normalize_tool_choice(choice);
            request.insert("tool_choice".to_string(), normalized);
        }

        if let Some(tools) = request.get("tools") {
            let normalized = normalize_tools(tools);
            request.insert("tools".to_string(), normalized);
        }

        let max_tokens = validate_max_tokens(request.get("max_tokens"), self.default_max_tokens);
        request.insert("max_tokens".to_string(), Value::from(max_tokens));

        let message_count = request
            .get("messages")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let tool_count = request
            .get("tools")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        tracing::debug!(
            "Translated chat request: messages={}, tools={}, max_tokens={}, policy={}",
            message_count,
            tool_count,
            max_tokens,
            self.content.as_str()
        );

        Value::Object(request)
    }

    /// Rewrite the canonical model id to the alias in a `/models` listing.
    ///
    /// Returns `None` when the body is not JSON; the caller relays it raw.
    pub fn translate_models_listing(&self, body: &[u8]) -> Option<Value> {
        let mut listing: Value = match serde_json::from_slice(body) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Models listing is not JSON, relaying raw: {}", e);
                return None;
            }
        };

        let rewritten = self.alias.rewrite_listing(&mut listing);
        if rewritten > 0 {
            tracing::debug!(
                "Models listing: {} -> {} ({} entr{})",
                self.alias.canonical(),
                self.alias.alias(),
                rewritten,
                if rewritten == 1 { "y" } else { "ies" }
            );
        }
        Some(listing)
    }
}

/// Whether a (normalized) request asks for a streamed response
pub fn wants_stream(body: &Value) -> bool {
    body.get("stream").map(is_truthy).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline(content: ContentNormalizer) -> TranslationPipeline {
        TranslationPipeline::new(
            content,
            ModelAlias::new("anthropic-claude-opus-4.5", "do-opus-4.5"),
            DEFAULT_MAX_TOKENS,
        )
    }

    fn drop_pipeline() -> TranslationPipeline {
        pipeline(ContentNormalizer::TextCollapse {
            drop_tool_use: true,
        })
    }

    #[test]
    fn test_endpoint_from_path() {
        assert_eq!(Endpoint::from_path("chat/completions"), Endpoint::ChatCompletions);
        assert_eq!(Endpoint::from_path("models"), Endpoint::Models);
        assert_eq!(Endpoint::from_path("models/foo"), Endpoint::Other);
        assert_eq!(Endpoint::from_path("embeddings"), Endpoint::Other);
    }

    #[test]
    fn test_full_request_translation() {
        let body = json!({
            "model": "Do-Opus-4.5",
            "stream": true,
            "temperature": 0.2,
            "messages": [
                {"role": "user", "content": "What's the weather?"},
                {"role": "assistant", "content": [
                    {"type": "text", "text": "Checking."},
                    {"type": "tool_use", "id": "t1", "name": "get_weather", "input": {"city": "Oslo"}}
                ]}
            ],
            "tools": [{"name": "get_weather", "description": "Weather", "input_schema": {"type": "object"}}],
            "tool_choice": {"type": "any"},
            "max_tokens": "7.9"
        });

        let out = drop_pipeline().translate_chat_request(body);

        assert_eq!(out["model"], "anthropic-claude-opus-4.5");
        assert_eq!(out["stream"], true);
        assert_eq!(out["temperature"], 0.2);
        assert_eq!(out["messages"][0]["content"], "What's the weather?");
        assert_eq!(out["messages"][1]["content"], "Checking.");
        assert_eq!(out["tools"][0]["type"], "function");
        assert_eq!(
            out["tools"][0]["function"]["parameters"],
            json!({"type": "object", "properties": {}})
        );
        assert_eq!(out["tool_choice"], "auto");
        assert_eq!(out["max_tokens"], 7);
    }

    #[test]
    fn test_structured_request_translation() {
        let body = json!({
            "model": "gpt-4o",
            "messages": [{"role": "assistant", "content": [
                {"type": "tool_use", "id": "t1", "name": "search", "input": {"q": "x"}}
            ]}]
        });

        let out = pipeline(ContentNormalizer::StructuredToolCalls).translate_chat_request(body);

        assert_eq!(out["model"], "gpt-4o");
        assert_eq!(out["messages"][0]["content"], "");
        assert_eq!(out["messages"][0]["tool_calls"][0]["function"]["name"], "search");
        assert_eq!(out["max_tokens"], 1024);
    }

    #[test]
    fn test_absent_fields_not_synthesized() {
        let out = drop_pipeline().translate_chat_request(json!({"messages": []}));
        assert!(out.get("model").is_none());
        assert!(out.get("tools").is_none());
        assert!(out.get("tool_choice").is_none());
        assert_eq!(out["max_tokens"], 1024);
    }

    #[test]
    fn test_null_tool_choice_kept() {
        let out = drop_pipeline().translate_chat_request(json!({"tool_choice": null}));
        assert_eq!(out["tool_choice"], Value::Null);
    }

    #[test]
    fn test_non_object_body_untouched() {
        let out = drop_pipeline().translate_chat_request(json!([1, 2]));
        assert_eq!(out, json!([1, 2]));
    }

    #[test]
    fn test_models_listing_translation() {
        let body = br#"{"object":"list","data":[{"id":"anthropic-claude-opus-4.5"}]}"#;
        let listing = drop_pipeline().translate_models_listing(body).unwrap();
        assert_eq!(listing["data"][0]["id"], "do-opus-4.5");

        assert!(drop_pipeline().translate_models_listing(b"<html>").is_none());
    }

    #[test]
    fn test_wants_stream() {
        assert!(wants_stream(&json!({"stream": true})));
        assert!(!wants_stream(&json!({"stream": false})));
        assert!(!wants_stream(&json!({})));
        assert!(!wants_stream(&json!(null)));
    }
}
