//! Core data types shared across the crate.

use std::collections::BTreeMap;

use serde_json::{
    Map,
    Value,
};

/// Nested translation data for a single language.
///
/// Branches are JSON objects and leaves are JSON strings. Any other value
/// (number, boolean, null, array) is neither, and lookups treat it as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree {
    /// Top-level object of the document
    root: Map<String, Value>,
}

impl TranslationTree {
    /// Wrap an already-parsed JSON object.
    #[must_use]
    pub const fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Wrap a JSON value, which must be an object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    /// Top-level object, where every key path starts
    #[must_use]
    pub const fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Whether the document has no keys at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Translation trees keyed by language code.
///
/// Built once by the loader and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStore {
    /// Language code -> tree
    trees: BTreeMap<String, TranslationTree>,
}

impl TranslationStore {
    /// Empty store
    #[must_use]
    pub const fn new() -> Self {
        Self { trees: BTreeMap::new() }
    }

    /// Insert or replace the tree for `language`, returning the previous one.
    pub fn insert(
        &mut self,
        language: impl Into<String>,
        tree: TranslationTree,
    ) -> Option<TranslationTree> {
        self.trees.insert(language.into(), tree)
    }

    /// Tree for `language`, if loaded
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&TranslationTree> {
        self.trees.get(language)
    }

    /// Whether a tree is loaded for `language`
    #[must_use]
    pub fn contains(&self, language: &str) -> bool {
        self.trees.contains_key(language)
    }

    /// Language codes in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    /// Number of loaded languages
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Whether no language is loaded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl FromIterator<(String, TranslationTree)> for TranslationStore {
    fn from_iter<I: IntoIterator<Item = (String, TranslationTree)>>(iter: I) -> Self {
        Self { trees: iter.into_iter().collect() }
    }
}

/// Result of a language switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The language is now selected and the preference was written.
    Switched,
    /// The store has no tree for the requested language; nothing changed.
    Unavailable,
}

impl SwitchOutcome {
    /// `true` for [`SwitchOutcome::Switched`]
    #[must_use]
    pub const fn is_switched(self) -> bool {
        matches!(self, Self::Switched)
    }
}
