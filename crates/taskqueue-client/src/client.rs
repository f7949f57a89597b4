//! Queue client: batch building, submission and length queries.

use tracing::{debug, info, warn};

use taskqueue_config::{ClearPolicy, Config, ConfigValidator};
use taskqueue_protocol::wire::{push_form, query_form};
use taskqueue_protocol::{
    Credentials, DEFAULT_BACKEND_URL, HmacSha256Signer, LengthQuery, OperationResult, QueueError,
    ResponseDecoder, SignedRequest, TaskBatch, TaskInput, TaskOptions,
};

use crate::error::ClientError;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Client for one queue.
///
/// Operations take `&mut self` and perform at most one round-trip each.
/// The most recent error stays readable through
/// [`QueueClient::last_error_code`] and [`QueueClient::last_error_message`].
pub struct QueueClient {
    batch: TaskBatch,
    credentials: Credentials,
    signer: HmacSha256Signer,
    transport: Box<dyn HttpTransport>,
    base_url: String,
    clear_policy: ClearPolicy,
    errno: i64,
    errmsg: String,
}

impl QueueClient {
    /// Create a client for `queue_name` sending through `transport`.
    ///
    /// Call [`QueueClient::set_auth`] before adding tasks.
    pub fn new(queue_name: impl Into<String>, transport: impl HttpTransport + 'static) -> Self {
        let credentials = Credentials::default();
        Self {
            batch: TaskBatch::new(queue_name),
            signer: HmacSha256Signer::from_credentials(&credentials),
            credentials,
            transport: Box::new(transport),
            base_url: DEFAULT_BACKEND_URL.to_string(),
            clear_policy: ClearPolicy::default(),
            errno: QueueError::CODE_OK,
            errmsg: "OK".to_string(),
        }
    }

    /// Build a client from configuration, using the reqwest transport.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let validation = ConfigValidator::validate(config)?;
        for warning in &validation.warnings {
            warn!(path = %warning.path, "{}", warning.message);
        }
        if let Some(err) = validation.into_error() {
            return Err(err.into());
        }

        let transport = ReqwestTransport::new(&config.backend)?;
        let mut client = Self::new(config.queue.name.clone(), transport)
            .with_base_url(config.backend.base_url.clone())
            .with_clear_policy(config.queue.clear_policy);
        client.set_auth(
            &config.auth.app_name,
            &config.auth.access_key,
            &config.auth.secret_key,
            config.auth.app_version.as_deref(),
        );
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    /// Set the application credentials. Values are trimmed.
    pub fn set_auth(
        &mut self,
        app_name: &str,
        access_key: &str,
        secret_key: &str,
        app_version: Option<&str>,
    ) {
        self.credentials = Credentials::new(app_name, access_key, secret_key, app_version);
        self.signer = HmacSha256Signer::from_credentials(&self.credentials);
        debug!(app = %self.credentials.app_name(), "Credentials set");
    }

    /// Add one task by URL, or several from a collection of descriptors.
    ///
    /// `post_data`, `priority` and `options` apply only to a URL input;
    /// descriptors carry their own. A failed collection add empties the
    /// batch.
    pub fn add_task(
        &mut self,
        tasks: impl Into<TaskInput>,
        post_data: Option<&[u8]>,
        priority: bool,
        options: &TaskOptions,
    ) -> Result<(), QueueError> {
        let result = match tasks.into() {
            TaskInput::Url(url) => {
                self.batch
                    .add_single(&self.credentials, &url, post_data, priority, options)
            }
            TaskInput::Descriptors(descriptors) => {
                self.batch.add_descriptors(&self.credentials, &descriptors)
            }
            TaskInput::Mapping(mapping) => self.batch.add_mapping(&self.credentials, &mapping),
        };
        self.record(result)
    }

    /// Submit the batch.
    ///
    /// Oversized batches are refused and kept. Under
    /// [`ClearPolicy::BeforeSend`] the batch is emptied before the request
    /// goes out, so a failed submission drops its tasks.
    pub async fn push(&mut self) -> OperationResult {
        let json = match self.batch.to_json_checked() {
            Ok(json) => json,
            Err(e) => return self.record(Err(e)),
        };

        if self.batch.is_empty() {
            return self.record(Err(QueueError::EmptyQueue));
        }

        let count = self.batch.len();
        if self.clear_policy == ClearPolicy::BeforeSend {
            self.batch.clear();
        }

        debug!(queue = %self.batch.queue_name(), count, "Pushing batch");
        let result = self.send(&push_form(&json)).await;

        if result.is_ok() {
            info!(queue = %self.batch.queue_name(), count, "Batch pushed");
            if self.clear_policy == ClearPolicy::OnSuccess {
                self.batch.clear();
            }
        }
        result
    }

    /// Number of tasks waiting in the remote queue.
    pub async fn current_length(&mut self) -> Result<i64, QueueError> {
        self.query_length(LengthQuery::Current).await
    }

    /// Number of tasks the remote queue can still accept.
    pub async fn remaining_length(&mut self) -> Result<i64, QueueError> {
        self.query_length(LengthQuery::Remaining).await
    }

    async fn query_length(&mut self, query: LengthQuery) -> Result<i64, QueueError> {
        let json = match self.batch.to_json() {
            Ok(json) => json,
            Err(e) => return self.record(Err(e)),
        };

        let reply = self.send(&query_form(&json, query)).await?;
        let length = reply.data_as_i64().ok_or_else(|| {
            QueueError::MalformedResponse(format!("{} reply carries no integer data", query.act()))
        });
        self.record(length)
    }

    /// Sign, send and decode one request, recording the outcome.
    async fn send(&mut self, fields: &[(&str, String)]) -> OperationResult {
        let request = match SignedRequest::post_form(&self.base_url, &self.signer, fields) {
            Ok(request) => request,
            Err(e) => return self.record(Err(e)),
        };
        let response = self.transport.post(request).await;
        let result = ResponseDecoder::decode(&response);

        if let Ok(reply) = &result {
            self.errno = QueueError::CODE_OK;
            self.errmsg = reply.message.clone();
        }
        self.record(result)
    }

    fn record<T>(&mut self, result: Result<T, QueueError>) -> Result<T, QueueError> {
        if let Err(e) = &result {
            self.errno = e.code();
            self.errmsg = e.to_string();
        }
        result
    }

    /// Code of the most recent error; `0` before any.
    pub fn last_error_code(&self) -> i64 {
        self.errno
    }

    /// Message of the most recent error; `"OK"` before any.
    pub fn last_error_message(&self) -> &str {
        &self.errmsg
    }

    pub fn batch(&self) -> &TaskBatch {
        &self.batch
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
