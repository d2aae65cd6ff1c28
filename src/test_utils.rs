//! Shared helpers for unit tests.
#![cfg(test)]

use serde_json::Value;

use crate::types::{
    TranslationStore,
    TranslationTree,
};

/// Build a store from a JSON object of `language -> tree`.
///
/// Entries whose value is not an object are skipped.
pub(crate) fn store_from_json(value: Value) -> TranslationStore {
    let Value::Object(languages) = value else {
        return TranslationStore::new();
    };

    languages
        .into_iter()
        .filter_map(|(language, tree)| TranslationTree::from_value(tree).map(|t| (language, t)))
        .collect()
}
