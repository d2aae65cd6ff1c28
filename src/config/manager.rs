//! Site settings held for the lifetime of a page session

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
    loader,
};
use crate::input::TranslationSource;

/// Holds the validated settings and the site root they were loaded from
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// Current settings
    current_settings: I18nSettings,

    /// Site root; relative source and preference paths resolve against it
    site_root: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a manager holding the default settings
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), site_root: None }
    }

    /// Load settings for `site_root`.
    ///
    /// `.site-i18n.json` wins when present. Without it, the defaults are used
    /// and any `languages/<code>.json` files found under the root replace the
    /// default source map. On error the current settings are kept.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load_settings(&mut self, site_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match &site_root {
            Some(root) => match loader::load_from_root(root)? {
                Some(settings) => settings,
                None => Self::discovered_settings(root)?,
            },
            None => I18nSettings::default(),
        };

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(site_root = ?site_root, settings = ?settings, "Settings loaded");
        self.current_settings = settings;
        self.site_root = site_root;

        Ok(())
    }

    /// Defaults, with sources taken from the root's languages directory if it has any.
    fn discovered_settings(root: &Path) -> Result<I18nSettings, ConfigError> {
        let sources = loader::discover_sources(root)?;
        if sources.is_empty() {
            return Ok(I18nSettings::default());
        }
        Ok(I18nSettings { sources, ..I18nSettings::default() })
    }

    /// Replace the current settings, keeping the site root
    ///
    /// # Errors
    /// Validation error; the current settings are kept in that case
    pub fn update_settings(&mut self, new_settings: I18nSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(settings = ?new_settings, "Settings updated");
        self.current_settings = new_settings;

        Ok(())
    }

    /// Settings currently in effect
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// Root the settings were loaded from, if any
    #[must_use]
    pub const fn site_root(&self) -> Option<&PathBuf> {
        self.site_root.as_ref()
    }

    /// Configured translation sources resolved against the site root
    #[must_use]
    pub fn translation_sources(&self) -> Vec<TranslationSource> {
        self.current_settings.translation_sources(self.site_root.as_deref())
    }

    /// Preference file location resolved against the site root
    #[must_use]
    pub fn preference_path(&self) -> Option<PathBuf> {
        self.current_settings.preference_path(self.site_root.as_deref())
    }
}
