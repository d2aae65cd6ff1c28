//! Initial language detection.
//!
//! Order: persisted preference, then the user's locale, then the fallback
//! language. A candidate is only accepted when the store has a tree for it.

use std::collections::BTreeMap;

use crate::types::TranslationStore;

/// The operating system locale, e.g. `nb-NO` or `en_US.UTF-8`.
#[must_use]
pub fn system_locale() -> Option<String> {
    sys_locale::get_locale()
}

/// Lowercased primary subtag of a locale.
///
/// `"nb-NO"` -> `"nb"`, `"en_US.UTF-8"` -> `"en"`. Empty input yields `None`.
#[must_use]
pub fn primary_subtag(locale: &str) -> Option<String> {
    let subtag = locale.trim().split(['-', '_', '.', '@']).next()?.to_lowercase();
    if subtag.is_empty() { None } else { Some(subtag) }
}

/// Map a locale to an available language code.
///
/// The primary subtag is looked up in `aliases` first (so `nb` can map to `no`).
/// Anything the store does not contain maps to `fallback`.
#[must_use]
pub fn detect_language(
    locale: Option<&str>,
    store: &TranslationStore,
    aliases: &BTreeMap<String, String>,
    fallback: &str,
) -> String {
    let detected = locale
        .and_then(primary_subtag)
        .map(|subtag| aliases.get(&subtag).cloned().unwrap_or(subtag))
        .filter(|language| store.contains(language));

    match detected {
        Some(language) => language,
        None => {
            tracing::debug!(?locale, fallback, "Locale not supported, using fallback language");
            fallback.to_string()
        }
    }
}

/// Choose the language selected at startup.
#[must_use]
pub fn initial_language(
    persisted: Option<&str>,
    locale: Option<&str>,
    store: &TranslationStore,
    aliases: &BTreeMap<String, String>,
    fallback: &str,
) -> String {
    if let Some(language) = persisted {
        if store.contains(language) {
            return language.to_string();
        }
        tracing::warn!(language, "Persisted language is not available, ignoring it");
    }

    detect_language(locale, store, aliases, fallback)
}
