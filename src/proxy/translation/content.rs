//! Message content normalization
//!
//! Collapses Anthropic-style content (a string or an array of content blocks)
//! into the shape an OpenAI-compatible backend accepts.
//!
//! # Strategies
//!
//! | Strategy                                  | tool_use blocks                     | Join    |
//! |-------------------------------------------|-------------------------------------|---------|
//! | `TextCollapse { drop_tool_use: true }`    | dropped                             | `" "`   |
//! | `TextCollapse { drop_tool_use: false }`   | rendered as `[Tool Use: ...]` text  | `"\n\n"`|
//! | `StructuredToolCalls`                     | moved to `tool_calls`               | `"\n"`  |

use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// Content Blocks
// ============================================================================

/// A single element of an array-valued `content` field
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock<'a> {
    /// `{"type": "text", "text": ...}`
    Text(String),
    /// `{"type": "tool_use", "id": ..., "name": ..., "input": ...}`
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    /// Any other object, including untyped or unknown block types
    Other(&'a Value),
    /// A non-object array element (bare string, number, ...)
    Scalar(&'a Value),
}

impl<'a> ContentBlock<'a> {
    /// Classify a raw JSON element. Never fails: unknown shapes become `Other`.
    pub fn classify(value: &'a Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ContentBlock::Scalar(value);
        };

        match obj.get("type").and_then(Value::as_str) {
            Some("text") => ContentBlock::Text(match obj.get("text") {
                None | Some(Value::Null) => String::new(),
                Some(text) => string_form(text),
            }),
            Some("tool_use") => ContentBlock::ToolUse {
                id: obj.get("id").map(string_form).unwrap_or_default(),
                name: obj.get("name").map(string_form).unwrap_or_default(),
                input: obj
                    .get("input")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            },
            _ => ContentBlock::Other(value),
        }
    }
}

// ============================================================================
// Tool Calls (structured output)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: &'static str,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded `input` object
    pub arguments: String,
}

impl ToolCall {
    fn from_tool_use(id: String, name: String, input: &Value) -> Self {
        Self {
            id,
            call_type: "function",
            function: FunctionCall {
                name,
                arguments: serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string()),
            },
        }
    }
}

// ============================================================================
// Content Normalizer
// ============================================================================

/// Selectable content normalization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentNormalizer {
    /// Content becomes a single string
    TextCollapse { drop_tool_use: bool },
    /// Text becomes a string, tool_use blocks become `tool_calls`
    StructuredToolCalls,
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        ContentNormalizer::TextCollapse {
            drop_tool_use: true,
        }
    }
}

impl ContentNormalizer {
    /// Config/CLI name of this strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentNormalizer::TextCollapse {
                drop_tool_use: true,
            } => "drop-tool-use",
            ContentNormalizer::TextCollapse {
                drop_tool_use: false,
            } => "render-tool-use",
            ContentNormalizer::StructuredToolCalls => "tool-calls",
        }
    }

    /// Parse a strategy name. Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop-tool-use" | "drop" => Some(ContentNormalizer::TextCollapse {
                drop_tool_use: true,
            }),
            "render-tool-use" | "render" => Some(ContentNormalizer::TextCollapse {
                drop_tool_use: false,
            }),
            "tool-calls" | "structured" => Some(ContentNormalizer::StructuredToolCalls),
            _ => None,
        }
    }

    /// Normalize every message of a `messages` value.
    ///
    /// A non-array `messages` value is returned unchanged.
    pub fn normalize_messages(&self, messages: &Value) -> Value {
        match messages {
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|msg| self.normalize_message(msg))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Normalize a single message, producing a new value.
    ///
    /// Messages without a `content` key are copied unchanged. A message that is
    /// not an object is replaced by its string form.
    pub fn normalize_message(&self, message: &Value) -> Value {
        let Some(obj) = message.as_object() else {
            return Value::String(string_form(message));
        };

        let mut out = obj.clone();
        let Some(content) = obj.get("content") else {
            return Value::Object(out);
        };

        match self {
            ContentNormalizer::TextCollapse { drop_tool_use } => {
                out.insert(
                    "content".to_string(),
                    Value::String(collapse_to_text(content, *drop_tool_use)),
                );
            }
            ContentNormalizer::StructuredToolCalls => {
                let (text, tool_calls) = split_tool_calls(content);
                out.insert("content".to_string(), Value::String(text));
                if !tool_calls.is_empty() {
                    let calls = serde_json::to_value(&tool_calls)
                        .unwrap_or_else(|_| Value::Array(Vec::new()));
                    out.insert("tool_calls".to_string(), calls);
                }
            }
        }

        Value::Object(out)
    }
}

/// Text-collapse policy for one `content` value
pub fn collapse_to_text(content: &Value, drop_tool_use: bool) -> String {
    let blocks = match content {
        Value::String(s) => return s.clone(),
        Value::Array(blocks) => blocks,
        other => return string_form(other),
    };

    let mut parts: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match ContentBlock::classify(block) {
            ContentBlock::Text(text) => parts.push(text),
            ContentBlock::ToolUse { .. } if drop_tool_use => {
                // Results arrive in a later tool message
            }
            ContentBlock::ToolUse { id, name, input } => {
                parts.push(render_tool_use(&id, &name, &input));
            }
            ContentBlock::Other(raw) => parts.push(raw.to_string()),
            ContentBlock::Scalar(raw) => parts.push(string_form(raw)),
        }
    }

    let separator = if drop_tool_use { " " } else { "\n\n" };
    parts.join(separator)
}

/// Structured policy for one `content` value: (text, tool_calls)
pub fn split_tool_calls(content: &Value) -> (String, Vec<ToolCall>) {
    let blocks = match content {
        Value::String(s) => return (s.clone(), Vec::new()),
        Value::Array(blocks) => blocks,
        other => return (string_form(other), Vec::new()),
    };

    let mut text_parts: Vec<String> = Vec::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for block in blocks {
        match ContentBlock::classify(block) {
            ContentBlock::Text(text) => text_parts.push(text),
            ContentBlock::ToolUse { id, name, input } => {
                tool_calls.push(ToolCall::from_tool_use(id, name, &input));
            }
            ContentBlock::Other(raw) => text_parts.push(raw.to_string()),
            ContentBlock::Scalar(raw) => text_parts.push(string_form(raw)),
        }
    }

    (text_parts.join("\n"), tool_calls)
}

fn render_tool_use(id: &str, name: &str, input: &Value) -> String {
    let pretty = serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());
    format!("[Tool Use: {} (id: {})\nInput: {}]", name, id, pretty)
}

/// String form of an arbitrary JSON value: strings verbatim, null empty,
/// everything else as compact JSON.
pub(crate) fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
