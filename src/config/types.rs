//! Site settings and their validation

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::embedded;
use crate::input::{
    SourceLocation,
    TranslationSource,
};
use crate::preference::FilePreferenceStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "sources.en")
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    /// Error for the field at `field_path`
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors raised while loading or applying settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields are invalid
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The configuration file could not be read
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`I18nSettings`]
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list of validation errors, one per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings read from `.site-i18n.json`. Missing fields take their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Second lookup attempt when the selected language lacks a key.
    pub fallback_language: String,

    /// Separator between key path segments.
    pub key_separator: String,

    /// Key under which the selected language is persisted.
    pub preference_key: String,

    /// Language code -> file path or `http(s)://` URL.
    /// Relative paths resolve against the site root.
    pub sources: BTreeMap<String, String>,

    /// Upper bound for fetching a single source.
    pub load_timeout_ms: u64,

    /// Locale primary subtag -> language code (e.g. `nb` -> `no`).
    pub locale_aliases: BTreeMap<String, String>,

    /// Preference file location. Relative paths resolve against the site root.
    /// If unset, `<config_dir>/site-i18n/preferences.json` is used.
    pub preference_file: Option<PathBuf>,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            fallback_language: "en".to_string(),
            key_separator: ".".to_string(),
            preference_key: "quala-language".to_string(),
            sources: BTreeMap::from([
                ("en".to_string(), "languages/en.json".to_string()),
                ("no".to_string(), "languages/no.json".to_string()),
            ]),
            load_timeout_ms: 5000,
            locale_aliases: BTreeMap::from([
                ("nb".to_string(), "no".to_string()),
                ("nn".to_string(), "no".to_string()),
            ]),
            preference_file: None,
        }
    }
}

impl I18nSettings {
    /// Check every field and collect all problems.
    ///
    /// # Errors
    /// - Required field is empty
    /// - Zero load timeout
    /// - The fallback language has neither a source nor embedded defaults
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.fallback_language.is_empty() {
            errors.push(ValidationError::new(
                "fallbackLanguage",
                "The fallback language cannot be empty. Example: \"en\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.preference_key.is_empty() {
            errors.push(ValidationError::new(
                "preferenceKey",
                "The preference key cannot be empty. Example: \"quala-language\"",
            ));
        }

        if self.load_timeout_ms == 0 {
            errors.push(ValidationError::new(
                "loadTimeoutMs",
                "The timeout must be greater than zero milliseconds",
            ));
        }

        for (language, location) in &self.sources {
            if language.is_empty() {
                errors.push(ValidationError::new("sources", "Language codes cannot be empty"));
            }
            if location.is_empty() {
                errors.push(ValidationError::new(
                    format!("sources.{language}"),
                    "The location cannot be empty. Example: \"languages/en.json\"",
                ));
            }
        }

        if !self.fallback_language.is_empty()
            && !self.sources.contains_key(&self.fallback_language)
            && embedded::default_tree(&self.fallback_language).is_none()
        {
            errors.push(ValidationError::new(
                "sources",
                format!(
                    "No source configured for the fallback language '{}', and no built-in \
                     translations exist for it",
                    self.fallback_language
                ),
            ));
        }

        for (subtag, language) in &self.locale_aliases {
            if subtag.is_empty() || language.is_empty() {
                errors.push(ValidationError::new(
                    format!("localeAliases.{subtag}"),
                    "Aliases must map a non-empty subtag to a non-empty language code",
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Upper bound for fetching a single source
    #[must_use]
    pub const fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    /// Configured sources, with relative paths joined onto `base_dir`.
    #[must_use]
    pub fn translation_sources(&self, base_dir: Option<&Path>) -> Vec<TranslationSource> {
        self.sources
            .iter()
            .map(|(language, location)| {
                TranslationSource::new(language.clone(), SourceLocation::parse(location, base_dir))
            })
            .collect()
    }

    /// Where preferences are stored, if a location can be determined.
    ///
    /// A relative `preferenceFile` is joined onto `base_dir` when one is given.
    #[must_use]
    pub fn preference_path(&self, base_dir: Option<&Path>) -> Option<PathBuf> {
        match (&self.preference_file, base_dir) {
            (Some(file), Some(base)) if file.is_relative() => Some(base.join(file)),
            (Some(file), _) => Some(file.clone()),
            (None, _) => FilePreferenceStore::default_location(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    /// default: site defaults are valid
    #[rstest]
    fn test_default_settings() {
        let settings = I18nSettings::default();

        assert!(settings.validate().is_ok());
        assert_that!(settings.fallback_language, eq("en"));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.preference_key, eq("quala-language"));
        assert_that!(settings.sources, len(eq(2)));
        assert_that!(settings.load_timeout_ms, eq(5000));
    }

    /// deserialize: omitted fields keep their defaults
    #[rstest]
    fn test_deserialize_partial_settings_keeps_defaults() {
        let json = r#"{"fallbackLanguage": "no", "sources": {"no": "lang/no.json"}}"#;
        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert!(settings.validate().is_ok());
        assert_that!(settings.fallback_language, eq("no"));
        assert_that!(settings.sources, len(eq(1)));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.preference_key, eq("quala-language"));
    }

    /// deserialize: every field is read
    #[rstest]
    fn test_deserialize_full_settings() {
        let json = r#"{
            "fallbackLanguage": "en",
            "keySeparator": ":",
            "preferenceKey": "site-language",
            "sources": {"en": "https://example.com/en.json", "sv": "sv.json"},
            "loadTimeoutMs": 250,
            "localeAliases": {"nb": "no"},
            "preferenceFile": "/tmp/prefs.json"
        }"#;
        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.key_separator, ":");
        assert_eq!(settings.preference_key, "site-language");
        assert_eq!(settings.load_timeout(), Duration::from_millis(250));
        assert_eq!(settings.preference_path(None), Some(PathBuf::from("/tmp/prefs.json")));
        assert_eq!(settings.locale_aliases.len(), 1);
    }

    #[rstest]
    #[case::empty_fallback(r#"{"fallbackLanguage": ""}"#, "fallbackLanguage")]
    #[case::empty_separator(r#"{"keySeparator": ""}"#, "keySeparator")]
    #[case::empty_preference_key(r#"{"preferenceKey": ""}"#, "preferenceKey")]
    #[case::zero_timeout(r#"{"loadTimeoutMs": 0}"#, "loadTimeoutMs")]
    #[case::empty_location(r#"{"sources": {"en": "", "no": "no.json"}}"#, "sources.en")]
    #[case::fallback_without_source_or_default(
        r#"{"fallbackLanguage": "sv", "sources": {"no": "no.json"}}"#,
        "sources"
    )]
    /// validate: each invalid field is reported under its path
    #[case::empty_alias(r#"{"localeAliases": {"nb": ""}}"#, "localeAliases.nb")]
    fn test_validate_rejects(#[case] json: &str, #[case] field_path: &str) {
        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        let errors = settings.validate().unwrap_err();

        assert!(
            errors.iter().any(|e| e.field_path == field_path),
            "expected an error for {field_path}, got {errors:?}"
        );
    }

    /// validate: all problems are reported at once
    #[rstest]
    fn test_validate_collects_all_errors() {
        let settings = I18nSettings {
            key_separator: String::new(),
            preference_key: String::new(),
            load_timeout_ms: 0,
            ..I18nSettings::default()
        };

        let errors = settings.validate().unwrap_err();

        assert_that!(errors, len(eq(3)));
    }

    /// validate: a fallback without a source is covered by embedded defaults
    #[rstest]
    fn test_validate_accepts_embedded_fallback() {
        let settings: I18nSettings =
            serde_json::from_str(r#"{"sources": {"no": "languages/no.json"}}"#).unwrap();

        assert!(settings.validate().is_ok());
    }

    /// preference_path: relative files join the base directory, absolute ones do not
    #[rstest]
    #[case::relative(Some("state/prefs.json"), Some("/srv/site"), "/srv/site/state/prefs.json")]
    #[case::relative_without_base(Some("state/prefs.json"), None, "state/prefs.json")]
    #[case::absolute(Some("/var/lib/prefs.json"), Some("/srv/site"), "/var/lib/prefs.json")]
    fn test_preference_path(
        #[case] preference_file: Option<&str>,
        #[case] base_dir: Option<&str>,
        #[case] expected: &str,
    ) {
        let settings = I18nSettings {
            preference_file: preference_file.map(PathBuf::from),
            ..I18nSettings::default()
        };

        assert_eq!(
            settings.preference_path(base_dir.map(Path::new)),
            Some(PathBuf::from(expected))
        );
    }

    /// preference_path: unset falls back to the platform config directory
    #[rstest]
    fn test_preference_path_default_location() {
        let settings = I18nSettings::default();

        assert_eq!(settings.preference_path(None), FilePreferenceStore::default_location());
    }

    /// translation_sources: relative paths join the base directory
    #[rstest]
    fn test_translation_sources_resolve_relative_paths() {
        let settings = I18nSettings::default();

        let sources = settings.translation_sources(Some(Path::new("/srv/site")));

        assert_eq!(
            sources,
            vec![
                TranslationSource::path("en", "/srv/site/languages/en.json"),
                TranslationSource::path("no", "/srv/site/languages/no.json"),
            ]
        );
    }

    /// ConfigError: validation errors are listed in order
    #[rstest]
    fn test_config_error_lists_validation_errors() {
        let error = ConfigError::ValidationErrors(vec![
            ValidationError::new("keySeparator", "The separator cannot be empty"),
            ValidationError::new("loadTimeoutMs", "The timeout must be greater than zero"),
        ]);

        let message = error.to_string();

        assert!(message.contains("1. keySeparator - The separator cannot be empty"));
        assert!(message.contains("2. loadTimeoutMs - The timeout must be greater than zero"));
    }
}
