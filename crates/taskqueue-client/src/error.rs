//! Client construction errors.

use thiserror::Error;

use taskqueue_config::ConfigError;

/// Failure to build a [`crate::QueueClient`]. Operation failures are
/// reported as [`taskqueue_protocol::QueueError`] instead.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
