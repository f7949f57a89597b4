//! Response interpretation.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::QueueError;
use crate::wire::{ERROR_HEADER, RawResponse};

/// Outcome of one network operation.
pub type OperationResult = Result<Reply, QueueError>;

/// A successful backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The backend's `errmsg`, normally `"OK"`.
    pub message: String,
    pub data: Option<Value>,
}

impl Reply {
    /// The reply data as an integer, if it is one. Numeric strings count.
    pub fn data_as_i64(&self) -> Option<i64> {
        match self.data.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Turns raw HTTP responses into typed outcomes.
pub struct ResponseDecoder;

impl ResponseDecoder {
    /// Interpret one response, checking in order: transport failure,
    /// non-200 status, empty body (error header), JSON body.
    pub fn decode(response: &RawResponse) -> OperationResult {
        // A zero status means no response was received.
        let status = response.status.filter(|s| *s != 0);
        let status = match (status, &response.transport_error) {
            (Some(status), None) => status,
            (_, Some(error)) => return Err(QueueError::Transport(error.clone())),
            (None, None) => {
                return Err(QueueError::Transport("no response received".to_string()));
            }
        };

        if status != 200 {
            warn!(status, "Task queue backend returned non-200 status");
            return Err(QueueError::HttpStatus(status));
        }

        if response.body.is_empty() {
            return Err(Self::decode_error_header(response));
        }

        Self::decode_body(&response.body)
    }

    /// Error reported through the `TaskQueueError: <code>,<message>` header.
    fn decode_error_header(response: &RawResponse) -> QueueError {
        let Some(raw) = response.header(ERROR_HEADER) else {
            warn!("Empty response without {} header", ERROR_HEADER);
            return QueueError::UnknownError;
        };

        let (code, message) = raw.split_once(',').unwrap_or((raw, ""));
        match code.trim().parse::<i64>() {
            Ok(code) => {
                debug!(code, "Decoded error header");
                QueueError::Backend {
                    code,
                    message: message.trim().to_string(),
                }
            }
            Err(_) => QueueError::MalformedResponse(format!(
                "invalid {} header: {}",
                ERROR_HEADER, raw
            )),
        }
    }

    fn decode_body(body: &[u8]) -> OperationResult {
        let text = String::from_utf8_lossy(body);
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| QueueError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        let Value::Object(mut object) = value else {
            return Err(QueueError::MalformedResponse(
                "response body is not a JSON object".to_string(),
            ));
        };

        let errno = object
            .get("errno")
            .and_then(errno_value)
            .ok_or_else(|| QueueError::MalformedResponse("missing or invalid errno".to_string()))?;

        let message = match object.get("errmsg") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        if errno != 0 {
            warn!(errno, errmsg = %message, "Task queue backend reported an error");
            return Err(QueueError::Backend {
                code: errno,
                message,
            });
        }

        let data = object.remove("data").filter(|d| !d.is_null());
        debug!(has_data = data.is_some(), "Task queue request succeeded");
        Ok(Reply { message, data })
    }
}

fn errno_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
