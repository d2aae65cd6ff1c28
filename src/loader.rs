//! Translation store loading.
//!
//! Sources are fetched concurrently. A source that is unavailable, slow or
//! malformed is replaced wholesale by the embedded tree for its language, and
//! the fallback language is always present in the returned store.

use futures::future::join_all;

use crate::config::I18nSettings;
use crate::embedded;
use crate::input::{
    LoadError,
    TranslationSource,
};
use crate::types::TranslationStore;

/// Load the store with a default HTTP client.
///
/// # Errors
/// - The HTTP client cannot be built
/// - The fallback language has neither a usable source nor an embedded default
pub async fn load_store(
    sources: &[TranslationSource],
    settings: &I18nSettings,
) -> Result<TranslationStore, LoadError> {
    let client = reqwest::Client::builder().build()?;
    load_store_with_client(sources, settings, &client).await
}

/// Load the store using a caller-provided HTTP client.
///
/// # Errors
/// The fallback language has neither a usable source nor an embedded default.
pub async fn load_store_with_client(
    sources: &[TranslationSource],
    settings: &I18nSettings,
    client: &reqwest::Client,
) -> Result<TranslationStore, LoadError> {
    let timeout = settings.load_timeout();
    tracing::debug!(sources = sources.len(), ?timeout, "Loading translations");

    let results = join_all(sources.iter().map(|source| async move {
        let result = source.fetch(client, timeout).await;
        (source, result)
    }))
    .await;

    let mut store = TranslationStore::new();
    for (source, result) in results {
        match result {
            Ok(tree) => {
                tracing::debug!(language = %source.language, "Translations loaded");
                store.insert(source.language.clone(), tree);
            }
            Err(error) => {
                if let Some(tree) = embedded::default_tree(&source.language) {
                    tracing::warn!(
                        language = %source.language,
                        location = %source.location,
                        %error,
                        "Failed to load translations, using embedded defaults"
                    );
                    store.insert(source.language.clone(), tree);
                } else {
                    tracing::warn!(
                        language = %source.language,
                        location = %source.location,
                        %error,
                        "Failed to load translations and no embedded defaults exist, skipping language"
                    );
                }
            }
        }
    }

    let fallback = &settings.fallback_language;
    if !store.contains(fallback) {
        let tree = embedded::default_tree(fallback)
            .ok_or_else(|| LoadError::NoUsableLanguage(fallback.clone()))?;
        tracing::info!(
            language = %fallback,
            "No source for fallback language, using embedded defaults"
        );
        store.insert(fallback.clone(), tree);
    }

    tracing::info!(languages = ?store.languages().collect::<Vec<_>>(), "Translation store ready");
    Ok(store)
}
