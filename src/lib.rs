//! site-i18n
//!
//! Translation resolution for a bilingual marketing site: nested dot-path
//! lookup with a fallback language, concurrent loading with embedded
//! defaults, and a persisted language preference.

pub mod config;
pub mod embedded;
pub mod input;
pub mod loader;
pub mod locale;
pub mod logging;
pub mod manager;
pub mod preference;
pub mod resolver;
mod test_utils;
pub mod types;

pub use manager::{
    LanguageManager,
    TextSink,
};
pub use resolver::Resolver;
pub use types::{
    SwitchOutcome,
    TranslationStore,
    TranslationTree,
};
