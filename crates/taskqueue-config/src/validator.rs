//! Configuration validation.

use url::Url;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// The first error as a [`ConfigError`], if any.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors
            .into_iter()
            .next()
            .map(|e| ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the whole configuration, credentials included.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = Self::validate_connection(config)?;
        Self::validate_auth(config, &mut result);
        Ok(result)
    }

    /// Validate everything except credentials.
    pub fn validate_connection(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();
        Self::validate_backend(config, &mut result);
        Self::validate_queue(config, &mut result);
        Ok(result)
    }

    fn validate_auth(config: &Config, result: &mut ValidationResult) {
        let auth = &config.auth;
        for (path, value) in [
            ("auth.app_name", &auth.app_name),
            ("auth.access_key", &auth.access_key),
            ("auth.secret_key", &auth.secret_key),
        ] {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "must not be empty"));
            }
        }

        if auth.app_version.as_deref().map(str::trim) == Some("0") {
            result.add_warning(ValidationWarning::new(
                "auth.app_version",
                "\"0\" is treated as no version",
            ));
        }
    }

    fn validate_backend(config: &Config, result: &mut ValidationResult) {
        let backend = &config.backend;

        match Url::parse(&backend.base_url) {
            Ok(url) => match url.scheme() {
                "https" => {}
                "http" => result.add_warning(ValidationWarning::new(
                    "backend.base_url",
                    "requests are sent over plain http",
                )),
                other => result.add_error(ValidationError::new(
                    "backend.base_url",
                    format!("unsupported scheme: {}", other),
                )),
            },
            Err(e) => result.add_error(ValidationError::new(
                "backend.base_url",
                format!("invalid url: {}", e),
            )),
        }

        if backend.connect_timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "backend.connect_timeout_seconds",
                "must be greater than 0",
            ));
        }

        if backend.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "backend.timeout_seconds",
                "must be greater than 0",
            ));
        }
    }

    fn validate_queue(config: &Config, result: &mut ValidationResult) {
        if config.queue.name.trim().is_empty() {
            result.add_error(ValidationError::new("queue.name", "must not be empty"));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
