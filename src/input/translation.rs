//! Translation document parsing

use std::collections::BTreeMap;

use serde_json::Value;

use crate::input::LoadError;
use crate::types::TranslationTree;

/// Parse a JSON translation document.
///
/// # Errors
/// - The text is not valid JSON
/// - The top-level value is not an object
pub fn parse_translation(json_text: &str) -> Result<TranslationTree, LoadError> {
    let value: Value = serde_json::from_str(json_text)?;
    let kind = value_kind(&value);

    TranslationTree::from_value(value).ok_or_else(|| {
        LoadError::Malformed(format!("expected an object at the top level, found {kind}"))
    })
}

/// Article + name of a JSON value's kind, for error messages.
const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Flatten a translation tree into a map of separator-joined keys to leaf strings.
///
/// Only string leaves are collected. Values that cannot be resolved as text
/// (numbers, booleans, null, arrays) are skipped.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use site_i18n::input::translation::flatten_tree;
/// use site_i18n::types::TranslationTree;
///
/// let tree = TranslationTree::from_value(json!({
///     "hero": {
///         "title": "We transform product training",
///         "cta": "Get started today"
///     }
/// }))
/// .unwrap_or_default();
///
/// let flattened = flatten_tree(&tree, ".");
/// assert_eq!(flattened.get("hero.title").map(String::as_str), Some("We transform product training"));
/// assert_eq!(flattened.get("hero.cta").map(String::as_str), Some("Get started today"));
/// ```
#[must_use]
pub fn flatten_tree(tree: &TranslationTree, separator: &str) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    for (key, value) in tree.root() {
        flatten_value(value, separator, key, &mut result);
    }
    result
}

/// Collect string leaves below `value` into `result`, keyed from `prefix`.
fn flatten_value(
    value: &Value,
    separator: &str,
    prefix: &str,
    result: &mut BTreeMap<String, String>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let full_key = format!("{prefix}{separator}{key}");
                flatten_value(child, separator, &full_key, result);
            }
        }
        Value::String(text) => {
            result.insert(prefix.to_string(), text.clone());
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    /// parse_translation: nested objects are kept
    #[googletest::test]
    fn test_parse_translation_nested() {
        let tree = parse_translation(r#"{"hero": {"title": "Hello"}}"#).unwrap();

        expect_that!(tree.root().len(), eq(1));
        expect_that!(tree.root()["hero"]["title"].as_str(), some(eq("Hello")));
    }

    /// parse_translation: an empty object is a valid, empty tree
    #[googletest::test]
    fn test_parse_translation_empty_object() {
        let tree = parse_translation("{}").unwrap();

        expect_that!(tree.is_empty(), eq(true));
    }

    /// parse_translation: top-level values other than objects are rejected
    #[rstest]
    #[case("[]", "an array")]
    #[case("\"hello\"", "a string")]
    #[case("42", "a number")]
    #[case("null", "null")]
    fn test_parse_translation_rejects_non_objects(#[case] text: &str, #[case] kind: &str) {
        let error = parse_translation(text).unwrap_err();

        assert!(matches!(error, LoadError::Malformed(_)));
        assert!(error.to_string().contains(kind), "unexpected message: {error}");
    }

    /// parse_translation: invalid JSON is a Parse error
    #[rstest]
    fn test_parse_translation_invalid_json() {
        let error = parse_translation("{ not json").unwrap_err();

        assert!(matches!(error, LoadError::Parse(_)));
    }

    /// flatten_tree: nested keys are joined with the separator
    #[googletest::test]
    fn test_flatten_tree_nested() {
        let tree = TranslationTree::from_value(json!({
            "nav": {
                "userLogin": "User Login",
                "adminLogin": "Admin Login"
            },
            "footer": {
                "info": {
                    "about": "About Us"
                }
            }
        }))
        .unwrap();

        let result = flatten_tree(&tree, ".");

        expect_that!(result.get("nav.userLogin"), some(eq(&"User Login".to_string())));
        expect_that!(result.get("nav.adminLogin"), some(eq(&"Admin Login".to_string())));
        expect_that!(result.get("footer.info.about"), some(eq(&"About Us".to_string())));
        expect_that!(result.len(), eq(3));
    }

    /// flatten_tree: any separator can be used
    #[googletest::test]
    fn test_flatten_tree_custom_separator() {
        let tree = TranslationTree::from_value(json!({"hero": {"title": "Hello"}})).unwrap();

        let result = flatten_tree(&tree, "/");

        expect_that!(result.get("hero/title"), some(eq(&"Hello".to_string())));
    }

    /// flatten_tree: only string leaves are collected
    #[googletest::test]
    fn test_flatten_tree_skips_non_string_values() {
        let tree = TranslationTree::from_value(json!({
            "count": 42,
            "enabled": true,
            "nothing": null,
            "items": ["a", "b"],
            "label": "Label"
        }))
        .unwrap();

        let result = flatten_tree(&tree, ".");

        expect_that!(result.len(), eq(1));
        expect_that!(result.get("label"), some(eq(&"Label".to_string())));
    }
}
