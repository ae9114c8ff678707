//! Loosely typed tool arguments
//!
//! Tool arguments arrive as an arbitrary JSON object. Handlers pull named
//! fields out of it without schema enforcement: a missing or mistyped field
//! becomes the zero value of the requested type.

use serde_json::{Map, Value};

/// Argument mapping for a single tool invocation
#[derive(Debug, Clone, Default)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Build from the `arguments` member of a `tools/call` request.
    /// Anything other than an object yields an empty mapping.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Object(map)) => Self(map.clone()),
            _ => Self::default(),
        }
    }

    /// String field, `""` when absent or not a string
    pub fn string(&self, key: &str) -> String {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Integer field, `0` when absent or not a number.
    /// Fractional numbers are truncated toward zero.
    pub fn integer(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            _ => 0,
        }
    }

    /// Boolean field, `false` when absent or not a boolean
    pub fn boolean(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or_default()
    }

    /// List of strings. Non-string elements become `""`; a missing or
    /// non-array field is an empty list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Arguments {
        Arguments::from_value(Some(&value))
    }

    #[test]
    fn test_string_coercion() {
        let a = args(json!({"owner": "rust-lang", "repo": 42}));
        assert_eq!(a.string("owner"), "rust-lang");
        assert_eq!(a.string("repo"), "");
        assert_eq!(a.string("missing"), "");
    }

    #[test]
    fn test_integer_coercion() {
        let a = args(json!({"number": 12, "float": 7.9, "negative": -3.5, "text": "12"}));
        assert_eq!(a.integer("number"), 12);
        assert_eq!(a.integer("float"), 7);
        assert_eq!(a.integer("negative"), -3);
        assert_eq!(a.integer("text"), 0);
        assert_eq!(a.integer("missing"), 0);
    }

    #[test]
    fn test_boolean_coercion() {
        let a = args(json!({"private": true, "public": "yes"}));
        assert!(a.boolean("private"));
        assert!(!a.boolean("public"));
        assert!(!a.boolean("missing"));
    }

    #[test]
    fn test_string_list_coercion() {
        let a = args(json!({"assignees": ["octocat", 5, "hubot"], "single": "octocat"}));
        assert_eq!(a.string_list("assignees"), vec!["octocat", "", "hubot"]);
        assert!(a.string_list("single").is_empty());
        assert!(a.string_list("missing").is_empty());
    }

    #[test]
    fn test_non_object_arguments_are_empty() {
        let a = args(json!(["not", "an", "object"]));
        assert_eq!(a.string("anything"), "");
        let a = Arguments::from_value(None);
        assert_eq!(a.integer("anything"), 0);
    }
}
