//! Translation key resolution with a single fallback language.
//!
//! A key path such as `hero.title` is split on the key separator and walked
//! from the root of the requested language's tree. When that walk does not end
//! on a string, the whole walk is repeated from the root of the fallback
//! language's tree. There is no partial fallback from the point of divergence.

use std::sync::Arc;

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::config::I18nSettings;
use crate::input::translation::flatten_tree;
use crate::types::TranslationStore;

/// Errors raised when constructing a [`Resolver`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// The store has no tree for the fallback language
    #[error("Fallback language '{0}' has no translations in the store")]
    MissingFallbackLanguage(String),

    /// The key separator is empty, so key paths cannot be split
    #[error("The key separator cannot be empty")]
    EmptySeparator,
}

/// Resolves key paths against a read-only translation store.
#[derive(Debug, Clone)]
pub struct Resolver {
    /// Loaded translations, shared with any other resolver built from them
    store: Arc<TranslationStore>,
    /// Language consulted when the requested one has no string for a key
    fallback_language: String,
    /// Separator between key path segments
    key_separator: String,
}

impl Resolver {
    /// Create a resolver over `store`.
    ///
    /// # Errors
    /// - The store has no tree for `fallback_language`
    /// - `key_separator` is empty
    pub fn new(
        store: impl Into<Arc<TranslationStore>>,
        fallback_language: impl Into<String>,
        key_separator: impl Into<String>,
    ) -> Result<Self, ResolverError> {
        let store = store.into();
        let fallback_language = fallback_language.into();
        let key_separator = key_separator.into();

        if key_separator.is_empty() {
            return Err(ResolverError::EmptySeparator);
        }
        if !store.contains(&fallback_language) {
            return Err(ResolverError::MissingFallbackLanguage(fallback_language));
        }

        Ok(Self { store, fallback_language, key_separator })
    }

    /// Create a resolver using the fallback language and separator from `settings`.
    ///
    /// # Errors
    /// See [`Resolver::new`].
    pub fn from_settings(
        store: impl Into<Arc<TranslationStore>>,
        settings: &I18nSettings,
    ) -> Result<Self, ResolverError> {
        Self::new(store, settings.fallback_language.clone(), settings.key_separator.clone())
    }

    /// Resolve `key_path` in `language`, falling back to the fallback language.
    ///
    /// Returns `None` when neither tree has a string at `key_path`. Callers
    /// should leave the currently displayed text unchanged in that case.
    #[must_use]
    pub fn resolve(&self, key_path: &str, language: &str) -> Option<&str> {
        let segments = self.segments(key_path)?;

        if let Some(text) = self.lookup(&segments, language) {
            return Some(text);
        }
        if language == self.fallback_language {
            return None;
        }

        let text = self.lookup(&segments, &self.fallback_language);
        if text.is_some() {
            tracing::trace!(
                key = key_path,
                language,
                fallback = %self.fallback_language,
                "Resolved through fallback language"
            );
        }
        text
    }

    /// Resolve `key_path` in `language` only, without falling back.
    #[must_use]
    pub fn resolve_exact(&self, key_path: &str, language: &str) -> Option<&str> {
        let segments = self.segments(key_path)?;
        self.lookup(&segments, language)
    }

    /// Keys the fallback language translates but `language` does not.
    ///
    /// Sorted. Empty when `language` is the fallback language.
    #[must_use]
    pub fn missing_keys(&self, language: &str) -> Vec<String> {
        let Some(fallback_tree) = self.store.get(&self.fallback_language) else {
            return Vec::new();
        };

        // Keys whose own names contain the separator cannot be addressed, so
        // only keys that resolve in the fallback tree are reported.
        flatten_tree(fallback_tree, &self.key_separator)
            .into_keys()
            .filter(|key| self.resolve_exact(key, &self.fallback_language).is_some())
            .filter(|key| self.resolve_exact(key, language).is_none())
            .collect()
    }

    /// Whether the store has a tree for `language`
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.store.contains(language)
    }

    /// The translations being resolved against
    #[must_use]
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Language consulted after the requested one
    #[must_use]
    pub fn fallback_language(&self) -> &str {
        &self.fallback_language
    }

    /// Separator between key path segments
    #[must_use]
    pub fn key_separator(&self) -> &str {
        &self.key_separator
    }

    /// Split `key_path` into segments. `None` if any segment is empty.
    fn segments<'k>(&self, key_path: &'k str) -> Option<Vec<&'k str>> {
        let segments: Vec<&str> = key_path.split(self.key_separator.as_str()).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return None;
        }
        Some(segments)
    }

    /// Walk `segments` in `language` only.
    fn lookup(&self, segments: &[&str], language: &str) -> Option<&str> {
        let tree = self.store.get(language)?;
        traverse(tree.root(), segments)
    }
}

/// Walk `segments` from `root`, descending only through objects.
fn traverse<'a>(root: &'a Map<String, Value>, segments: &[&str]) -> Option<&'a str> {
    let (last, parents) = segments.split_last()?;

    let mut node = root;
    for segment in parents {
        node = node.get(*segment)?.as_object()?;
    }

    node.get(*last)?.as_str()
}
