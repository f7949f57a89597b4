//! Task batch accumulation.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{TaskItem, TaskOptions, normalize_task_url};
use crate::auth::Credentials;
use crate::error::QueueError;

/// Largest serialized batch the backend accepts, in bytes.
pub const POST_LIMIT_SIZE: usize = 8_388_608;

/// Ordered batch of tasks bound for one queue.
///
/// Serializes to the wire payload `{"name": ..., "queue": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskBatch {
    name: String,
    queue: Vec<TaskItem>,
}

impl TaskBatch {
    pub fn new(queue_name: impl Into<String>) -> Self {
        Self {
            name: queue_name.into(),
            queue: Vec::new(),
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Serialize the batch to its JSON wire payload.
    pub fn to_json(&self) -> Result<String, QueueError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the batch, refusing payloads over [`POST_LIMIT_SIZE`].
    pub fn to_json_checked(&self) -> Result<String, QueueError> {
        let json = self.to_json()?;
        if json.len() > POST_LIMIT_SIZE {
            warn!(
                queue = %self.name,
                size = json.len(),
                "Serialized batch exceeds the post limit"
            );
            return Err(QueueError::PayloadTooLarge {
                size: json.len(),
                limit: POST_LIMIT_SIZE,
            });
        }
        Ok(json)
    }

    /// Append one task given by URL.
    ///
    /// An empty `post_data` counts as absent. On failure the batch is left
    /// as it was.
    pub fn add_single(
        &mut self,
        credentials: &Credentials,
        url: &str,
        post_data: Option<&[u8]>,
        priority: bool,
        options: &TaskOptions,
    ) -> Result<(), QueueError> {
        let Some(url) = normalize_task_url(url, credentials) else {
            warn!(queue = %self.name, url, "Rejected task url");
            return Err(QueueError::UnavailableTasks);
        };

        let post_data = post_data.filter(|data| !data.is_empty());
        self.queue
            .push(TaskItem::new(url, post_data, priority, options));
        debug!(queue = %self.name, len = self.queue.len(), "Task added");
        Ok(())
    }

    /// Append every descriptor of a sequence.
    ///
    /// All or nothing: the first invalid descriptor discards the whole
    /// batch, including items added by earlier calls.
    pub fn add_descriptors(
        &mut self,
        credentials: &Credentials,
        descriptors: &[Value],
    ) -> Result<(), QueueError> {
        self.add_each(credentials, descriptors.iter(), None)
    }

    /// Append the descriptors held as values of a mapping.
    ///
    /// The first value that is not a valid descriptor makes the mapping
    /// itself be tried as one descriptor; if it has a valid `url` it is
    /// appended and adding stops. Otherwise the whole batch is discarded.
    pub fn add_mapping(
        &mut self,
        credentials: &Credentials,
        mapping: &Map<String, Value>,
    ) -> Result<(), QueueError> {
        self.add_each(credentials, mapping.values(), Some(mapping))
    }

    fn add_each<'a>(
        &mut self,
        credentials: &Credentials,
        values: impl ExactSizeIterator<Item = &'a Value>,
        outer: Option<&Map<String, Value>>,
    ) -> Result<(), QueueError> {
        if values.len() == 0 {
            warn!(queue = %self.name, "Rejected empty task collection");
            return Err(QueueError::UnavailableTasks);
        }

        for value in values {
            if let Some(item) = value
                .as_object()
                .and_then(|d| TaskItem::from_descriptor(d, credentials))
            {
                self.queue.push(item);
            } else if let Some(item) =
                outer.and_then(|d| TaskItem::from_descriptor(d, credentials))
            {
                self.queue.push(item);
                break;
            } else {
                warn!(
                    queue = %self.name,
                    discarded = self.queue.len(),
                    "Invalid task descriptor, discarding batch"
                );
                self.queue.clear();
                return Err(QueueError::UnavailableTasks);
            }
        }

        debug!(queue = %self.name, len = self.queue.len(), "Tasks added");
        Ok(())
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
