//! Model alias - bidirectional renaming of one backend model id
//!
//! The backend lists a model under its canonical id
//! (e.g. `anthropic-claude-opus-4.5`), while clients know it by a shorter alias
//! (e.g. `do-opus-4.5`).
//!
//! ```toml
//! [translation]
//! canonical_model = "anthropic-claude-opus-4.5"
//! model_alias = "do-opus-4.5"
//! ```
//!
//! Inbound matching is forgiving (`"Do Opus 4.5"` matches `do-opus-4.5`);
//! outbound matching on the models listing is exact.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAlias {
    /// Id the backend understands
    canonical: String,
    /// Id the client sees
    alias: String,
    /// `alias` after `normalize_model_id`, computed once
    normalized_alias: String,
}

impl ModelAlias {
    pub fn new(canonical: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            canonical: canonical.into(),
            normalized_alias: normalize_model_id(&alias),
            alias,
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Map a client model id to the backend id.
    ///
    /// Returns `Some(canonical)` when `model` names the alias, `None` otherwise
    /// (the caller keeps the original value).
    pub fn to_backend(&self, model: &str) -> Option<&str> {
        if normalize_model_id(model) == self.normalized_alias {
            Some(&self.canonical)
        } else {
            None
        }
    }

    /// Rewrite the canonical id to the alias in a `/models` listing body.
    ///
    /// Only `data[].id` values equal to the canonical id are touched. Returns
    /// the number of entries rewritten.
    pub fn rewrite_listing(&self, listing: &mut Value) -> usize {
        let Some(entries) = listing.get_mut("data").and_then(Value::as_array_mut) else {
            return 0;
        };

        let mut rewritten = 0;
        for entry in entries.iter_mut() {
            let Some(id) = entry.get_mut("id") else {
                continue;
            };
            if id.as_str() == Some(self.canonical.as_str()) {
                *id = Value::String(self.alias.clone());
                rewritten += 1;
            }
        }
        rewritten
    }
}

/// Canonical comparison form: trimmed, lowercase, spaces as hyphens, no
/// repeated hyphens
pub fn normalize_model_id(model: &str) -> String {
    let lowered = model.trim().to_lowercase().replace(' ', "-");

    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opus() -> ModelAlias {
        ModelAlias::new("anthropic-claude-opus-4.5", "do-opus-4.5")
    }

    #[test]
    fn test_normalize_model_id() {
        assert_eq!(normalize_model_id("Do-Opus-4.5"), "do-opus-4.5");
        assert_eq!(normalize_model_id("do opus 4.5"), "do-opus-4.5");
        assert_eq!(normalize_model_id("do - opus---4.5"), "do-opus-4.5");
        assert_eq!(normalize_model_id("  DO-OPUS-4.5 "), "do-opus-4.5");
    }

    #[test]
    fn test_alias_maps_to_canonical() {
        let alias = opus();
        assert_eq!(alias.to_backend("Do-Opus-4.5"), Some("anthropic-claude-opus-4.5"));
        assert_eq!(alias.to_backend("do  opus 4.5"), Some("anthropic-claude-opus-4.5"));
    }

    #[test]
    fn test_other_models_untouched() {
        let alias = opus();
        assert_eq!(alias.to_backend("gpt-4o"), None);
        // The canonical id itself is not the alias
        assert_eq!(alias.to_backend("anthropic-claude-opus-4.5"), None);
    }

    #[test]
    fn test_listing_rewrite() {
        let alias = opus();
        let mut listing = json!({
            "object": "list",
            "data": [
                {"id": "anthropic-claude-opus-4.5", "object": "model"},
                {"id": "llama3-8b-instruct", "object": "model"},
                {"object": "model"}
            ]
        });

        assert_eq!(alias.rewrite_listing(&mut listing), 1);
        assert_eq!(listing["data"][0]["id"], "do-opus-4.5");
        assert_eq!(listing["data"][1]["id"], "llama3-8b-instruct");
        assert!(listing["data"][2].get("id").is_none());
    }

    #[test]
    fn test_listing_rewrite_is_exact_match() {
        let alias = opus();
        let mut listing = json!({"data": [{"id": "Anthropic-Claude-Opus-4.5"}]});
        assert_eq!(alias.rewrite_listing(&mut listing), 0);
        assert_eq!(listing["data"][0]["id"], "Anthropic-Claude-Opus-4.5");
    }

    #[test]
    fn test_listing_without_data() {
        let alias = opus();
        let mut listing = json!({"error": "nope"});
        assert_eq!(alias.rewrite_listing(&mut listing), 0);
        let mut listing = json!([1, 2]);
        assert_eq!(alias.rewrite_listing(&mut listing), 0);
    }
}
