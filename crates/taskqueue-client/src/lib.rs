//! # TaskQueue Client
//!
//! Asynchronous client for the task-queue service.
//!
//! ## Components
//!
//! - [`QueueClient`] - builds a batch, pushes it and queries queue lengths
//! - [`HttpTransport`] - the seam between the client and the HTTP stack
//! - [`ReqwestTransport`] - the default transport, built on reqwest

pub mod client;
pub mod error;
pub mod transport;

pub use client::QueueClient;
pub use error::ClientError;
pub use transport::{HttpTransport, ReqwestTransport};

pub use taskqueue_config::ClearPolicy;
pub use taskqueue_protocol::{OperationResult, QueueError, Reply, TaskDescriptor, TaskInput, TaskOptions};
