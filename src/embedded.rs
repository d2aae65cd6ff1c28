//! Translations compiled into the crate.
//!
//! These trees replace a language whose external source is missing or
//! malformed, so the store always holds the fallback language.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::input::translation::parse_translation;
use crate::types::{
    TranslationStore,
    TranslationTree,
};

/// `(language, document)` pairs compiled into the crate
const EMBEDDED_SOURCES: &[(&str, &str)] =
    &[("en", include_str!("../locales/en.json")), ("no", include_str!("../locales/no.json"))];

/// Parsed embedded documents. A document that fails to parse is logged and left out.
static EMBEDDED_TREES: LazyLock<BTreeMap<&'static str, TranslationTree>> = LazyLock::new(|| {
    EMBEDDED_SOURCES
        .iter()
        .filter_map(|(language, text)| match parse_translation(text) {
            Ok(tree) => Some((*language, tree)),
            Err(error) => {
                tracing::error!(language, %error, "Embedded translations are invalid");
                None
            }
        })
        .collect()
});

/// Embedded default tree for `language`, if one was compiled in.
#[must_use]
pub fn default_tree(language: &str) -> Option<TranslationTree> {
    EMBEDDED_TREES.get(language).cloned()
}

/// Languages with an embedded default tree.
#[must_use]
pub fn embedded_languages() -> impl Iterator<Item = &'static str> {
    EMBEDDED_TREES.keys().copied()
}

/// A store holding every embedded tree.
#[must_use]
pub fn embedded_store() -> TranslationStore {
    EMBEDDED_TREES.iter().map(|(language, tree)| ((*language).to_string(), tree.clone())).collect()
}
