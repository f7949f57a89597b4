use super::*;

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.backend.base_url, "http://g.sinacloud.com");
    assert_eq!(config.backend.connect_timeout_seconds, 10);
    assert_eq!(config.backend.timeout_seconds, 30);
    assert_eq!(config.queue.name, "default");
    assert_eq!(config.queue.clear_policy, ClearPolicy::BeforeSend);
    assert!(config.auth.app_name.is_empty());
    assert!(config.logging.dir.is_none());
}

#[test]
fn test_clear_policy_serde() {
    let policy: ClearPolicy = serde_json::from_str("\"on_success\"").unwrap();
    assert_eq!(policy, ClearPolicy::OnSuccess);
    assert_eq!(
        serde_json::to_string(&ClearPolicy::BeforeSend).unwrap(),
        "\"before_send\""
    );
}

#[test]
fn test_auth_debug_redacts_secret() {
    let auth = AuthConfig {
        app_name: "app".to_string(),
        access_key: "ak".to_string(),
        secret_key: "super-secret".to_string(),
        app_version: None,
    };
    let debug = format!("{:?}", auth);
    assert!(debug.contains("app"));
    assert!(!debug.contains("super-secret"));
}

#[test]
fn test_backend_partial_deserialize() {
    let backend: BackendConfig =
        serde_json::from_value(serde_json::json!({"base_url": "https://tq.example.com"})).unwrap();
    assert_eq!(backend.base_url, "https://tq.example.com");
    assert_eq!(backend.timeout_seconds, 30);
}

#[test]
fn test_logging_dir_path_expands_tilde() {
    let logging = LoggingConfig {
        dir: Some("~/logs".to_string()),
    };
    let path = logging.dir_path().unwrap();
    assert!(!path.starts_with("~"));
    assert!(path.ends_with("logs"));

    assert!(LoggingConfig::default().dir_path().is_none());
}
