//! Tool definition normalization
//!
//! Clients declare tools in several shapes. All of them are mapped to the
//! OpenAI function-tool shape:
//!
//! ```text
//! {"type": "function", "function": {"name", "description", "parameters"}}
//! ```
//!
//! | Input shape                                        | Schema taken from             |
//! |----------------------------------------------------|-------------------------------|
//! | `{function: {name, description, parameters}}`      | `function.parameters`         |
//! | `{function: {name, description, input_schema}}`    | `function.input_schema`       |
//! | `{name, description, input_schema}` (Anthropic)    | `input_schema`                |
//! | `{name, description, parameters}`                  | `parameters`                  |
//! | `{name, description, custom: {input_schema}}`      | `custom.input_schema`         |
//! | anything else                                      | synthesized empty schema      |

use serde_json::{json, Map, Value};

use super::content::string_form;

const UNKNOWN_FUNCTION: &str = "unknown_function";

/// Detected declaration shape, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolShape {
    Function,
    InputSchema,
    Parameters,
    Bare,
    Unrecognized,
}

impl ToolShape {
    fn detect(tool: &Map<String, Value>) -> Self {
        if tool.contains_key("function") {
            ToolShape::Function
        } else if tool.contains_key("input_schema") {
            ToolShape::InputSchema
        } else if tool.contains_key("parameters") {
            ToolShape::Parameters
        } else if tool.contains_key("name") || tool.contains_key("description") {
            ToolShape::Bare
        } else {
            ToolShape::Unrecognized
        }
    }
}

/// Normalize a `tools` value.
///
/// Non-array values and empty arrays are returned unchanged.
pub fn normalize_tools(tools: &Value) -> Value {
    match tools {
        Value::Array(items) => Value::Array(items.iter().map(normalize_tool).collect()),
        other => other.clone(),
    }
}

/// Normalize one tool declaration. Non-object entries pass through unchanged.
pub fn normalize_tool(tool: &Value) -> Value {
    let Some(obj) = tool.as_object() else {
        return tool.clone();
    };

    let empty = Map::new();
    let (source, schema) = match ToolShape::detect(obj) {
        ToolShape::Function => {
            let func = obj
                .get("function")
                .and_then(Value::as_object)
                .unwrap_or(&empty);
            let schema = func
                .get("parameters")
                .filter(|v| is_truthy(v))
                .or_else(|| func.get("input_schema"));
            (func, schema)
        }
        ToolShape::InputSchema => (obj, obj.get("input_schema")),
        ToolShape::Parameters => (obj, obj.get("parameters")),
        ToolShape::Bare => (
            obj,
            obj.get("custom")
                .and_then(Value::as_object)
                .and_then(|custom| custom.get("input_schema")),
        ),
        ToolShape::Unrecognized => (&empty, None),
    };

    json!({
        "type": "function",
        "function": {
            "name": tool_name(source),
            "description": source.get("description").map(string_form).unwrap_or_default(),
            "parameters": complete_schema(schema),
        }
    })
}

fn tool_name(source: &Map<String, Value>) -> String {
    match source.get("name").map(string_form) {
        Some(name) if !name.is_empty() => name,
        _ => UNKNOWN_FUNCTION.to_string(),
    }
}

/// Guarantee an object schema carrying at least `type` and `properties`
fn complete_schema(schema: Option<&Value>) -> Value {
    let mut schema = match schema {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    schema
        .entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    schema
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    Value::Object(schema)
}

/// JSON truthiness: null, false, 0, "", [] and {} are falsy
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_schema() -> Value {
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    }

    fn expected_weather_tool() -> Value {
        json!({
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Current weather",
                "parameters": weather_schema()
            }
        })
    }

    #[test]
    fn test_all_shapes_produce_identical_output() {
        let shapes = [
            json!({"type": "function", "function": {
                "name": "get_weather", "description": "Current weather", "parameters": weather_schema()
            }}),
            json!({"function": {
                "name": "get_weather", "description": "Current weather", "input_schema": weather_schema()
            }}),
            json!({"name": "get_weather", "description": "Current weather", "input_schema": weather_schema()}),
            json!({"name": "get_weather", "description": "Current weather", "parameters": weather_schema()}),
            json!({"type": "custom", "name": "get_weather", "description": "Current weather",
                   "custom": {"input_schema": weather_schema()}}),
        ];

        for shape in &shapes {
            assert_eq!(normalize_tool(shape), expected_weather_tool(), "shape: {}", shape);
        }
    }

    #[test]
    fn test_empty_parameters_falls_back_to_input_schema() {
        let tool = json!({"function": {
            "name": "get_weather", "description": "Current weather",
            "parameters": {}, "input_schema": weather_schema()
        }});
        assert_eq!(normalize_tool(&tool), expected_weather_tool());
    }

    #[test]
    fn test_missing_name_and_description_get_defaults() {
        let out = normalize_tool(&json!({"input_schema": {"type": "object"}}));
        assert_eq!(out["function"]["name"], "unknown_function");
        assert_eq!(out["function"]["description"], "");

        let out = normalize_tool(&json!({"name": "", "parameters": {}}));
        assert_eq!(out["function"]["name"], "unknown_function");
    }

    #[test]
    fn test_schema_is_completed() {
        let out = normalize_tool(&json!({"name": "a", "input_schema": {"required": []}}));
        assert_eq!(
            out["function"]["parameters"],
            json!({"type": "object", "properties": {}, "required": []})
        );

        let out = normalize_tool(&json!({"name": "a", "parameters": "not a schema"}));
        assert_eq!(
            out["function"]["parameters"],
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_existing_schema_type_is_kept() {
        let out = normalize_tool(&json!({"name": "a", "input_schema": {"type": "array"}}));
        assert_eq!(out["function"]["parameters"]["type"], "array");
    }

    #[test]
    fn test_unrecognized_shape_still_canonical() {
        let out = normalize_tool(&json!({"foo": "bar"}));
        assert_eq!(
            out,
            json!({"type": "function", "function": {
                "name": "unknown_function",
                "description": "",
                "parameters": {"type": "object", "properties": {}}
            }})
        );
    }

    #[test]
    fn test_non_object_function_field_is_tolerated() {
        let out = normalize_tool(&json!({"function": "search"}));
        assert_eq!(out["function"]["name"], "unknown_function");
    }

    #[test]
    fn test_non_object_entries_pass_through() {
        let tools = json!(["raw", 3, {"name": "ok"}]);
        let out = normalize_tools(&tools);
        assert_eq!(out[0], "raw");
        assert_eq!(out[1], 3);
        assert_eq!(out[2]["function"]["name"], "ok");
    }

    #[test]
    fn test_non_array_tools_pass_through() {
        assert_eq!(normalize_tools(&Value::Null), Value::Null);
        assert_eq!(normalize_tools(&json!([])), json!([]));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!({})));
        assert!(is_truthy(&json!({"a": 1})));
        assert!(is_truthy(&json!(-1)));
    }
}
