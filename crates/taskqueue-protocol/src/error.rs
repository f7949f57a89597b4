//! Task-queue errors.

use thiserror::Error;

/// Failure of any task-queue operation.
///
/// The `Display` text of each variant is the message the client reports as
/// its last error message; [`QueueError::code`] is the matching error code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("Unavailable tasks")]
    UnavailableTasks,

    #[error("The post data is too large.")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("The queue is empty.")]
    EmptyQueue,

    #[error("{0}")]
    Transport(String),

    #[error("Taskqueue service internal error, http code isn't 200, http code: {0}")]
    HttpStatus(u16),

    #[error("{message}")]
    Backend { code: i64, message: String },

    #[error("unknown error")]
    UnknownError,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),
}

impl QueueError {
    pub const CODE_OK: i64 = 0;
    pub const CODE_INVALID: i64 = 1;
    pub const CODE_INTERNAL: i64 = 500;
    pub const CODE_UNKNOWN_NO_BODY: i64 = 501;
    pub const CODE_UNKNOWN: i64 = 999;

    /// Error code as reported to callers.
    pub fn code(&self) -> i64 {
        match self {
            QueueError::UnavailableTasks
            | QueueError::PayloadTooLarge { .. }
            | QueueError::EmptyQueue => Self::CODE_INVALID,
            QueueError::Transport(_)
            | QueueError::HttpStatus(_)
            | QueueError::Serialization(_)
            | QueueError::Signing(_) => Self::CODE_INTERNAL,
            QueueError::Backend { code, .. } => *code,
            QueueError::UnknownError => Self::CODE_UNKNOWN_NO_BODY,
            QueueError::MalformedResponse(_) => Self::CODE_UNKNOWN,
        }
    }

    /// Whether the failure was detected locally, before any network call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            QueueError::UnavailableTasks
                | QueueError::PayloadTooLarge { .. }
                | QueueError::EmptyQueue
                | QueueError::Serialization(_)
                | QueueError::Signing(_)
        )
    }
}

impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        QueueError::Serialization(err.to_string())
    }
}
