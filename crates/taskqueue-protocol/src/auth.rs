//! Application credentials.

use std::fmt;

/// Domain suffix under which applications serve root-relative task URLs.
pub const APP_DOMAIN_SUFFIX: &str = "applinzi.com";

/// Credentials of the application owning the queue.
///
/// All fields are trimmed on construction.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    app_name: String,
    access_key: String,
    secret_key: String,
    app_version: Option<String>,
}

impl Credentials {
    pub fn new(
        app_name: impl AsRef<str>,
        access_key: impl AsRef<str>,
        secret_key: impl AsRef<str>,
        app_version: Option<&str>,
    ) -> Self {
        let app_version = app_version
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "0")
            .map(str::to_string);

        Self {
            app_name: app_name.as_ref().trim().to_string(),
            access_key: access_key.as_ref().trim().to_string(),
            secret_key: secret_key.as_ref().trim().to_string(),
            app_version,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// The application version, if one is set. `"0"` counts as unset.
    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }

    /// Origin root-relative task URLs are resolved against,
    /// e.g. `http://2.myapp.applinzi.com`.
    pub fn app_origin(&self) -> String {
        match &self.app_version {
            Some(version) => format!(
                "http://{}.{}.{}",
                version, self.app_name, APP_DOMAIN_SUFFIX
            ),
            None => format!("http://{}.{}", self.app_name, APP_DOMAIN_SUFFIX),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_name", &self.app_name)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("app_version", &self.app_version)
            .finish()
    }
}
