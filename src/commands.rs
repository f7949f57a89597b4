//! Command handlers.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use taskqueue_client::{QueueClient, QueueError, TaskInput, TaskOptions};

use crate::cli::PushArgs;

/// Add the requested tasks and push them.
pub(crate) async fn push(client: &mut QueueClient, args: PushArgs) -> Result<(), QueueError> {
    match &args.tasks {
        Some(path) => {
            let input = read_tasks(path)?;
            client.add_task(input, None, false, &Map::new())?;
        }
        None => {
            let url = args.url.clone().unwrap_or_default();
            let mut options = TaskOptions::new();
            if let Some(delay) = args.delay {
                options.insert("delay".to_string(), Value::from(delay));
            }
            client.add_task(
                url,
                args.data.as_deref().map(str::as_bytes),
                args.prior,
                &options,
            )?;
        }
    }

    let count = client.batch().len();
    let reply = client.push().await?;
    info!(count, message = %reply.message, "Push accepted");
    println!("{}", reply.message);
    Ok(())
}

pub(crate) async fn curlen(client: &mut QueueClient) -> Result<(), QueueError> {
    let length = client.current_length().await?;
    println!("{length}");
    Ok(())
}

pub(crate) async fn leftlen(client: &mut QueueClient) -> Result<(), QueueError> {
    let length = client.remaining_length().await?;
    println!("{length}");
    Ok(())
}

/// Read a task file holding a JSON array of descriptors or one descriptor.
fn read_tasks(path: &Path) -> Result<TaskInput, QueueError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        QueueError::Serialization(format!("Failed to read {}: {e}", path.display()))
    })?;
    let value: Value = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "Loaded task file");
    TaskInput::from_json(value).ok_or(QueueError::UnavailableTasks)
}
