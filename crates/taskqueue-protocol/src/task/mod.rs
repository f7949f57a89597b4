//! Task model: items, batches and caller input.

mod batch;
mod input;
mod target;

pub use batch::{TaskBatch, POST_LIMIT_SIZE};
pub use input::{TaskDescriptor, TaskInput, TaskOptions};
pub use target::{is_valid_absolute_url, normalize_task_url};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::Credentials;
use input::{delay_option, is_truthy};

/// One normalized unit of work, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    url: String,
    /// Base64 of the raw POST body.
    #[serde(rename = "postdata", skip_serializing_if = "Option::is_none")]
    post_data: Option<String>,
    #[serde(rename = "prior", skip_serializing_if = "std::ops::Not::not")]
    priority: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    delay: Option<i64>,
}

impl TaskItem {
    /// Build an item from an already-normalized URL.
    pub(crate) fn new(
        url: String,
        post_data: Option<&[u8]>,
        priority: bool,
        options: &TaskOptions,
    ) -> Self {
        Self {
            url,
            post_data: post_data.map(|data| STANDARD.encode(data)),
            priority,
            delay: delay_option(options),
        }
    }

    /// Build an item from a descriptor mapping, or `None` if the mapping
    /// lacks a valid `url` or carries a non-scalar `postdata`.
    pub(crate) fn from_descriptor(
        descriptor: &Map<String, Value>,
        credentials: &Credentials,
    ) -> Option<Self> {
        let url = descriptor.get("url")?.as_str()?;
        let url = normalize_task_url(url, credentials)?;

        let post_data = match descriptor.get("postdata") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(STANDARD.encode(s.as_bytes())),
            Some(Value::Number(n)) => Some(STANDARD.encode(n.to_string())),
            Some(Value::Bool(b)) => Some(STANDARD.encode(if *b { "1" } else { "" })),
            Some(_) => return None,
        };

        let delay = descriptor
            .get("options")
            .and_then(Value::as_object)
            .and_then(delay_option);

        Some(Self {
            url,
            post_data,
            priority: descriptor.get("prior").is_some_and(is_truthy),
            delay,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The base64-encoded POST body, if any.
    pub fn post_data(&self) -> Option<&str> {
        self.post_data.as_deref()
    }

    pub fn priority(&self) -> bool {
        self.priority
    }

    pub fn delay_seconds(&self) -> Option<i64> {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("app", "ak", "sk", None)
    }

    #[test]
    fn test_item_wire_form_minimal() {
        let item = TaskItem::new("http://a.com/x".into(), None, false, &Map::new());
        assert_eq!(serde_json::to_value(&item).unwrap(), json!({"url": "http://a.com/x"}));
    }

    #[test]
    fn test_item_wire_form_full() {
        let mut options = Map::new();
        options.insert("delay".into(), json!(60));
        let item = TaskItem::new("http://a.com/x".into(), Some(b"a=1".as_slice()), true, &options);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"url": "http://a.com/x", "postdata": "YT0x", "prior": true, "delay": 60})
        );
        assert_eq!(item.delay_seconds(), Some(60));
    }

    #[test]
    fn test_from_descriptor_normalizes_and_encodes() {
        let Value::Object(d) = json!({"url": "/p.php", "postdata": "act=test", "prior": 1,
            "options": {"delay": "5", "other": true}}) else { unreachable!() };
        let item = TaskItem::from_descriptor(&d, &creds()).unwrap();
        assert_eq!(item.url(), "http://app.applinzi.com/p.php");
        assert_eq!(item.post_data(), Some("YWN0PXRlc3Q="));
        assert!(item.priority());
        assert_eq!(item.delay_seconds(), Some(5));
    }

    #[test]
    fn test_from_descriptor_rejects_missing_or_bad_url() {
        let Value::Object(no_url) = json!({"postdata": "x"}) else { unreachable!() };
        assert!(TaskItem::from_descriptor(&no_url, &creds()).is_none());

        let Value::Object(bad) = json!({"url": "not a url"}) else { unreachable!() };
        assert!(TaskItem::from_descriptor(&bad, &creds()).is_none());

        let Value::Object(numeric) = json!({"url": 5}) else { unreachable!() };
        assert!(TaskItem::from_descriptor(&numeric, &creds()).is_none());
    }

    #[test]
    fn test_from_descriptor_rejects_structured_post_data() {
        let Value::Object(d) = json!({"url": "/p", "postdata": {"a": 1}}) else { unreachable!() };
        assert!(TaskItem::from_descriptor(&d, &creds()).is_none());
    }

    #[test]
    fn test_from_descriptor_null_post_data_is_absent() {
        let Value::Object(d) = json!({"url": "/p", "postdata": null}) else { unreachable!() };
        let item = TaskItem::from_descriptor(&d, &creds()).unwrap();
        assert_eq!(item.post_data(), None);
    }
}
