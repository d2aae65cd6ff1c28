//! Settings for translation loading, resolution and persistence

mod loader;
mod manager;
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    LANGUAGES_DIR,
};
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    I18nSettings,
    ValidationError,
};
