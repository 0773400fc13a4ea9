use thiserror::Error;

/// Failures that abort a whole run. Parse anomalies never end up here; they
/// resolve to sentinel values inside the parsers.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP {status} fetching {url}")]
    Transport {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("section id {0} produced by more than one chair")]
    DuplicateSection(String),

    #[error("catedra id {0} listed more than once")]
    DuplicateCatedra(String),

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

impl CatalogError {
    pub fn selector(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}
