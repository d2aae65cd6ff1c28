//! Translation sources: where a language's document is fetched from.

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use crate::input::LoadError;
use crate::input::translation::parse_translation;
use crate::types::TranslationTree;

/// Location of a translation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A file on disk
    Path(PathBuf),
    /// An `http://` or `https://` URL
    Url(String),
}

impl SourceLocation {
    /// Interpret a configured location string.
    ///
    /// `http://` and `https://` prefixes select a URL. Anything else is a
    /// file path; relative paths are joined onto `base_dir` when one is given.
    #[must_use]
    pub fn parse(location: &str, base_dir: Option<&Path>) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Url(location.to_string());
        }

        let path = Path::new(location);
        match base_dir {
            Some(base) if path.is_relative() => Self::Path(base.join(path)),
            _ => Self::Path(path.to_path_buf()),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// A named source for one language's translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSource {
    /// Language code the document is stored under
    pub language: String,
    /// Where the document is fetched from
    pub location: SourceLocation,
}

impl TranslationSource {
    /// Source for `language` at `location`
    #[must_use]
    pub fn new(language: impl Into<String>, location: SourceLocation) -> Self {
        Self { language: language.into(), location }
    }

    /// Source read from a file
    #[must_use]
    pub fn path(language: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(language, SourceLocation::Path(path.into()))
    }

    /// Source fetched over HTTP
    #[must_use]
    pub fn url(language: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(language, SourceLocation::Url(url.into()))
    }

    /// Fetch and parse the document, giving up after `timeout`.
    ///
    /// # Errors
    /// - The file cannot be read, or the request fails or returns a non-success status
    /// - The source does not answer within `timeout`
    /// - The document is not a JSON object
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
        timeout: Duration,
    ) -> Result<TranslationTree, LoadError> {
        tracing::debug!(language = %self.language, location = %self.location, "Fetching translations");

        let text = tokio::time::timeout(timeout, self.read_text(client))
            .await
            .map_err(|_| LoadError::Timeout(timeout))??;

        parse_translation(&text)
    }

    /// Raw document text. HTTP responses must have a success status.
    async fn read_text(&self, client: &reqwest::Client) -> Result<String, LoadError> {
        match &self.location {
            SourceLocation::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
            SourceLocation::Url(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status { url: url.clone(), status: status.as_u16() });
                }
                Ok(response.text().await?)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// parse: URLs stay URLs, relative paths join the base directory
    #[rstest]
    #[case("https://example.com/languages/en.json", None, SourceLocation::Url("https://example.com/languages/en.json".to_string()))]
    #[case("http://localhost:8080/no.json", Some("/srv/site"), SourceLocation::Url("http://localhost:8080/no.json".to_string()))]
    #[case("languages/en.json", None, SourceLocation::Path(PathBuf::from("languages/en.json")))]
    #[case("languages/en.json", Some("/srv/site"), SourceLocation::Path(PathBuf::from("/srv/site/languages/en.json")))]
    #[case("/etc/site/no.json", Some("/srv/site"), SourceLocation::Path(PathBuf::from("/etc/site/no.json")))]
    fn test_source_location_parse(
        #[case] location: &str,
        #[case] base_dir: Option<&str>,
        #[case] expected: SourceLocation,
    ) {
        let result = SourceLocation::parse(location, base_dir.map(Path::new));
        assert_eq!(result, expected);
    }

    /// Display: paths and URLs print as configured
    #[rstest]
    fn test_source_location_display() {
        let url = SourceLocation::Url("https://example.com/en.json".to_string());
        let path = SourceLocation::Path(PathBuf::from("languages/en.json"));

        assert_eq!(url.to_string(), "https://example.com/en.json");
        assert_eq!(path.to_string(), "languages/en.json");
    }

    /// fetch: a file source is read and parsed
    #[tokio::test]
    async fn test_fetch_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("en.json");
        fs::write(&path, r#"{"hero": {"title": "Hello"}}"#).unwrap();

        let source = TranslationSource::path("en", &path);
        let tree = source.fetch(&reqwest::Client::new(), Duration::from_secs(5)).await.unwrap();

        assert_eq!(tree.root()["hero"]["title"].as_str(), Some("Hello"));
    }

    /// fetch: a missing file is an Io error
    #[tokio::test]
    async fn test_fetch_missing_file() {
        let temp_dir = TempDir::new().unwrap();

        let source = TranslationSource::path("en", temp_dir.path().join("missing.json"));
        let result = source.fetch(&reqwest::Client::new(), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    /// fetch: a non-object document is Malformed
    #[tokio::test]
    async fn test_fetch_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let source = TranslationSource::path("no", &path);
        let result = source.fetch(&reqwest::Client::new(), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }
}
