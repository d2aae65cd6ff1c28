//! Reading settings from a site root

use std::collections::BTreeMap;
use std::path::Path;

use super::{
    ConfigError,
    I18nSettings,
};

/// Name of the configuration file looked up in the site root.
pub const CONFIG_FILE_NAME: &str = ".site-i18n.json";

/// Directory scanned for `<language>.json` files when there is no configuration file.
pub const LANGUAGES_DIR: &str = "languages";

/// Read `.site-i18n.json` from the site root.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and was parsed
/// - `Ok(None)`: there is no configuration file
///
/// # Errors
/// - File read error
/// - JSON parse error
pub(super) fn load_from_root(site_root: &Path) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = site_root.join(CONFIG_FILE_NAME);

    if !config_path.is_file() {
        tracing::debug!(path = %config_path.display(), "No configuration file");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&config_path)?;
    let settings: I18nSettings = serde_json::from_str(&content)?;
    tracing::debug!(path = %config_path.display(), "Configuration file read");

    Ok(Some(settings))
}

/// Find `languages/<code>.json` files under the site root.
///
/// Returns `language -> relative path`, ready for [`I18nSettings::sources`].
/// A missing directory yields an empty map.
///
/// # Errors
/// The directory exists but cannot be listed.
pub(super) fn discover_sources(
    site_root: &Path,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let languages_dir = site_root.join(LANGUAGES_DIR);
    if !languages_dir.is_dir() {
        return Ok(BTreeMap::new());
    }

    let mut sources = BTreeMap::new();
    for entry in std::fs::read_dir(&languages_dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().is_none_or(|extension| extension != "json") {
            continue;
        }
        let Some(language) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if language.is_empty() {
            continue;
        }
        sources.insert(language.to_string(), format!("{LANGUAGES_DIR}/{language}.json"));
    }

    tracing::debug!(
        dir = %languages_dir.display(),
        languages = ?sources.keys().collect::<Vec<_>>(),
        "Discovered translation files"
    );
    Ok(sources)
}
