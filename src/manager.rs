//! Language selection state
//!
//! `LanguageManager` owns the selected language for a page session. It reads
//! the persisted preference once at startup and writes it back on every
//! successful switch. Page rendering stays outside: the manager only hands
//! resolved strings to a [`TextSink`] and publishes switches on a watch channel.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::config::{
    ConfigManager,
    I18nSettings,
};
use crate::input::LoadError;
use crate::loader::load_store;
use crate::locale;
use crate::preference::{
    FilePreferenceStore,
    MemoryPreferenceStore,
    PreferenceStore,
};
use crate::resolver::{
    Resolver,
    ResolverError,
};
use crate::types::SwitchOutcome;

/// Receives resolved text for the page.
pub trait TextSink {
    /// Apply `text` to every element bound to `key`.
    fn apply_text(&mut self, key: &str, text: &str);

    /// Called once after a render pass with the language that was applied.
    fn language_applied(&mut self, _language: &str) {}
}

/// Errors raised by [`LanguageManager::initialize`]
#[derive(Error, Debug)]
pub enum InitError {
    /// No tree could be produced for the fallback language
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The loaded store cannot back a resolver
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Selected language plus everything needed to resolve and persist it
pub struct LanguageManager {
    /// Lookup over the loaded store
    resolver: Arc<Resolver>,
    /// Currently selected language, always present in the store
    selected: String,
    /// Where the selection is persisted
    preferences: Box<dyn PreferenceStore>,
    /// Key the selection is persisted under
    preference_key: String,
    /// Publishes every successful switch
    changes: watch::Sender<String>,
}

impl std::fmt::Debug for LanguageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageManager")
            .field("resolver", &self.resolver)
            .field("selected", &self.selected)
            .field("preferences", &"<dyn PreferenceStore>")
            .field("preference_key", &self.preference_key)
            .finish_non_exhaustive()
    }
}

impl LanguageManager {
    /// Create a manager and choose the initial language.
    ///
    /// The persisted preference wins if the store has it, then `locale`,
    /// then the fallback language. Nothing is written at startup.
    pub fn new(
        resolver: Arc<Resolver>,
        preferences: Box<dyn PreferenceStore>,
        settings: &I18nSettings,
        locale: Option<&str>,
    ) -> Self {
        let persisted = match preferences.get(&settings.preference_key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, "Failed to read language preference");
                None
            }
        };

        let selected = locale::initial_language(
            persisted.as_deref(),
            locale,
            resolver.store(),
            &settings.locale_aliases,
            resolver.fallback_language(),
        );
        tracing::info!(language = %selected, ?persisted, ?locale, "Initial language selected");

        let (changes, _) = watch::channel(selected.clone());

        Self {
            resolver,
            selected,
            preferences,
            preference_key: settings.preference_key.clone(),
            changes,
        }
    }

    /// Load translations and preferences described by `config`.
    ///
    /// Pass [`locale::system_locale`] as `locale` to follow the OS setting.
    ///
    /// # Errors
    /// - No tree can be produced for the fallback language
    /// - The resolver rejects the loaded store
    pub async fn initialize(config: &ConfigManager, locale: Option<&str>) -> Result<Self, InitError> {
        let settings = config.get_settings();

        let store = load_store(&config.translation_sources(), settings).await?;
        let resolver = Arc::new(Resolver::from_settings(store, settings)?);

        Ok(Self::new(resolver, preference_store_for(config.preference_path()), settings, locale))
    }

    /// Switch to `language` if the store has it.
    ///
    /// A failed preference write is logged and does not undo the switch.
    pub fn switch_language(&mut self, language: &str) -> SwitchOutcome {
        if !self.resolver.has_language(language) {
            tracing::warn!(language, "Language not available");
            return SwitchOutcome::Unavailable;
        }

        self.selected.clear();
        self.selected.push_str(language);

        if let Err(error) = self.preferences.set(&self.preference_key, language) {
            tracing::warn!(language, %error, "Failed to save language preference");
        }

        self.changes.send_replace(self.selected.clone());
        tracing::debug!(language, "Language switched");

        SwitchOutcome::Switched
    }

    /// Resolve `key_path` in the selected language.
    #[must_use]
    pub fn translate(&self, key_path: &str) -> Option<&str> {
        self.resolver.resolve(key_path, &self.selected)
    }

    /// Push resolved text for `keys` into `sink`.
    ///
    /// Keys that resolve to nothing, or to an empty string, are skipped so the
    /// page keeps its current text. Returns the number of keys applied.
    pub fn render<I, K, S>(&self, keys: I, sink: &mut S) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        S: TextSink + ?Sized,
    {
        let mut applied = 0;
        for key in keys {
            let key = key.as_ref();
            match self.translate(key) {
                Some(text) if !text.is_empty() => {
                    sink.apply_text(key, text);
                    applied += 1;
                }
                _ => tracing::debug!(key, language = %self.selected, "No translation found"),
            }
        }

        sink.language_applied(&self.selected);
        applied
    }

    /// Watch the selected language.
    ///
    /// The channel keeps only the latest value, so a renderer that batches
    /// rapid switches always ends on the last one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.changes.subscribe()
    }

    /// Selected language code
    #[must_use]
    pub fn current_language(&self) -> &str {
        &self.selected
    }

    /// Sorted language codes that can be switched to
    #[must_use]
    pub fn available_languages(&self) -> Vec<&str> {
        self.resolver.store().languages().collect()
    }

    /// Resolver over the loaded store
    #[must_use]
    pub const fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }
}

/// File-backed store at `path`, or memory when no location is known.
fn preference_store_for(path: Option<PathBuf>) -> Box<dyn PreferenceStore> {
    if let Some(path) = path {
        Box::new(FilePreferenceStore::new(path))
    } else {
        tracing::warn!("No preference location available, language choice will not persist");
        Box::new(MemoryPreferenceStore::new())
    }
}
