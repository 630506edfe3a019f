//! Tool choice normalization
//!
//! Anthropic encodes tool choice as an object (`{"type": "auto"}`), OpenAI as a
//! bare string (`"auto"`). Everything collapses to one of the three OpenAI
//! literals, with `"auto"` as the fallback.

use serde_json::Value;

const KNOWN_MODES: [&str; 3] = ["none", "auto", "required"];

/// Normalize a `tool_choice` value
///
/// - `null` stays `null`
/// - strings pass through unvalidated
/// - `{"type": "none" | "auto" | "required"}` becomes that literal
/// - anything else becomes `"auto"`
pub fn normalize_tool_choice(choice: &Value) -> Value {
    match choice {
        Value::Null => Value::Null,
        Value::String(_) => choice.clone(),
        Value::Object(obj) => {
            let mode = obj
                .get("type")
                .and_then(Value::as_str)
                .filter(|t| KNOWN_MODES.contains(t))
                .unwrap_or("auto");
            Value::String(mode.to_string())
        }
        _ => Value::String("auto".to_string()),
    }
}
