use thiserror::Error;

/// Errors that can occur while talking to the catalog or running a search.
///
/// An empty result list is not an error: every catalog operation returns
/// `Ok(vec![])` when nothing matched.
#[derive(Error, Debug)]
pub enum FinderError {
    /// The request failed, timed out or came back with a non-success status
    #[error("Failed to reach catalog service: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog answered with a body we could not decode
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    /// A name search was requested with empty text
    #[error("Search text cannot be empty")]
    EmptyQuery,

    /// One or more detail lookups of a category search failed
    #[error("{} of {total} recipe lookups failed: {}", .failed.len(), .failed.join(", "))]
    PartialLookupFailure {
        /// Ids whose lookup errored or returned no record
        failed: Vec<String>,
        /// Number of lookups issued
        total: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<serde_json::Error> for FinderError {
    fn from(err: serde_json::Error) -> Self {
        FinderError::InvalidResponse(err.to_string())
    }
}
