//! Error types shared across the mindlink crates.

/// Errors raised while resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum MindlinkError {
    /// A required environment variable is absent or empty.
    #[error("{0} not set")]
    MissingVar(&'static str),

    #[error("configuration error: {0}")]
    ConfigError(String),
}
