//! Caller-facing task input shapes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra per-task options. Only `delay` is recognized; other keys are ignored.
pub type TaskOptions = Map<String, Value>;

/// What a caller hands to `add_task`.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskInput {
    /// A single task URL; post data, priority and options come from the
    /// accompanying arguments.
    Url(String),
    /// A sequence of task descriptor mappings.
    Descriptors(Vec<Value>),
    /// A mapping passed where a collection is expected. Its values are
    /// tried as descriptors; if one is not, the mapping itself is taken as
    /// a single descriptor and adding stops there.
    Mapping(Map<String, Value>),
}

impl TaskInput {
    /// Interpret a JSON document as task input.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::String(url) => Some(TaskInput::Url(url)),
            Value::Array(items) => Some(TaskInput::Descriptors(items)),
            Value::Object(map) => Some(TaskInput::Mapping(map)),
            _ => None,
        }
    }
}

impl From<&str> for TaskInput {
    fn from(url: &str) -> Self {
        TaskInput::Url(url.to_string())
    }
}

impl From<String> for TaskInput {
    fn from(url: String) -> Self {
        TaskInput::Url(url)
    }
}

impl From<Vec<TaskDescriptor>> for TaskInput {
    fn from(descriptors: Vec<TaskDescriptor>) -> Self {
        TaskInput::Descriptors(
            descriptors
                .into_iter()
                .map(|d| Value::Object(d.into_mapping()))
                .collect(),
        )
    }
}

impl From<TaskDescriptor> for TaskInput {
    fn from(descriptor: TaskDescriptor) -> Self {
        TaskInput::Mapping(descriptor.into_mapping())
    }
}

/// Typed builder for one descriptor of a collection input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postdata: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prior: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: TaskOptions,
}

impl TaskDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_post_data(mut self, data: impl Into<String>) -> Self {
        self.postdata = Some(data.into());
        self
    }

    pub fn with_priority(mut self, prior: bool) -> Self {
        self.prior = prior;
        self
    }

    /// Delay execution by `seconds`. The backend caps this at 600.
    pub fn with_delay(mut self, seconds: u32) -> Self {
        self.options.insert("delay".to_string(), Value::from(seconds));
        self
    }

    pub fn into_mapping(self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("url".to_string(), Value::String(self.url));
        if let Some(data) = self.postdata {
            map.insert("postdata".to_string(), Value::String(data));
        }
        if self.prior {
            map.insert("prior".to_string(), Value::Bool(true));
        }
        if !self.options.is_empty() {
            map.insert("options".to_string(), Value::Object(self.options));
        }
        map
    }
}

/// Loose truthiness of a descriptor flag: `false`, `0`, `""`, `"0"`,
/// `null` and empty arrays are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Integer coercion for option values: numbers truncate, strings parse
/// their leading integer, booleans map to 0/1, anything else is 0.
pub(crate) fn int_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        Value::Bool(b) => i64::from(*b),
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(_) => 1,
        Value::Null => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Read the recognized keys out of an options mapping.
pub(crate) fn delay_option(options: &TaskOptions) -> Option<i64> {
    let mut delay = None;
    for (key, value) in options {
        match key.as_str() {
            "delay" => delay = Some(int_value(value)),
            _ => {}
        }
    }
    delay
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(
            TaskInput::from_json(json!("/a.php")),
            Some(TaskInput::Url("/a.php".to_string()))
        );
        assert!(matches!(
            TaskInput::from_json(json!([{"url": "/a"}])),
            Some(TaskInput::Descriptors(items)) if items.len() == 1
        ));
        assert!(matches!(
            TaskInput::from_json(json!({"url": "/a"})),
            Some(TaskInput::Mapping(_))
        ));
        assert!(TaskInput::from_json(json!(42)).is_none());
    }

    #[test]
    fn test_descriptor_into_mapping() {
        let map = TaskDescriptor::new("/a.php")
            .with_post_data("k=v")
            .with_priority(true)
            .with_delay(30)
            .into_mapping();
        assert_eq!(
            Value::Object(map),
            json!({"url": "/a.php", "postdata": "k=v", "prior": true, "options": {"delay": 30}})
        );
    }

    #[test]
    fn test_descriptor_minimal_mapping() {
        let map = TaskDescriptor::new("/a.php").into_mapping();
        assert_eq!(Value::Object(map), json!({"url": "/a.php"}));
    }

    #[test]
    fn test_descriptor_deserialize_defaults() {
        let d: TaskDescriptor = serde_json::from_value(json!({"url": "/x"})).unwrap();
        assert_eq!(d, TaskDescriptor::new("/x"));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([])));
    }

    #[test]
    fn test_int_value_coercion() {
        assert_eq!(int_value(&json!(30)), 30);
        assert_eq!(int_value(&json!(12.9)), 12);
        assert_eq!(int_value(&json!("45s")), 45);
        assert_eq!(int_value(&json!("  -7")), -7);
        assert_eq!(int_value(&json!("abc")), 0);
        assert_eq!(int_value(&json!(true)), 1);
        assert_eq!(int_value(&json!(null)), 0);
    }

    #[test]
    fn test_unknown_option_keys_ignored() {
        let options = json!({"delay": "10", "ttl": 5, "retries": 3});
        let Value::Object(options) = options else { unreachable!() };
        assert_eq!(delay_option(&options), Some(10));

        let options = json!({"ttl": 5});
        let Value::Object(options) = options else { unreachable!() };
        assert_eq!(delay_option(&options), None);
    }
}
