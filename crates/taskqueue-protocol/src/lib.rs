//! # TaskQueue Protocol
//!
//! Wire protocol of the task-queue service, independent of any HTTP client.
//!
//! ## Components
//!
//! - [`TaskBatch`] - validates, normalizes and accumulates tasks
//! - [`RequestSigner`] - timestamped HMAC-SHA256 request signing
//! - [`ResponseDecoder`] - maps raw responses to [`OperationResult`]
//! - [`QueueError`] - every failure, with its error code

pub mod auth;
pub mod decoder;
pub mod error;
pub mod signer;
pub mod task;
pub mod wire;

pub use auth::Credentials;
pub use decoder::{OperationResult, Reply, ResponseDecoder};
pub use error::QueueError;
pub use signer::{HmacSha256Signer, RequestSigner, SignedHeaders};
pub use task::{POST_LIMIT_SIZE, TaskBatch, TaskDescriptor, TaskInput, TaskItem, TaskOptions};
pub use wire::{
    DEFAULT_BACKEND_URL, ENDPOINT_PATH, LengthQuery, RawResponse, SignedRequest,
};
