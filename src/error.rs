use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a run. Bad flag values and rejected API keys are not
/// errors: the former are dropped, the latter mark preferences invalid.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("preferences file {}: {reason}", path.display())]
    Preferences { path: PathBuf, reason: String },

    #[error("config file {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}
