//! External translation inputs: documents and the sources they come from.
pub mod error;
pub mod source;
pub mod translation;

pub use error::LoadError;
pub use source::{
    SourceLocation,
    TranslationSource,
};
