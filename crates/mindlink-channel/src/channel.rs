//! Transport error type for Bot API calls.

use thiserror::Error;

/// Errors from chat transport operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),
}
