//! Task URL normalization.

use url::Url;

use crate::auth::Credentials;

/// Resolve a task URL against the application origin and validate it.
///
/// Root-relative URLs (leading `/`) are prefixed with
/// [`Credentials::app_origin`]; anything else must already be absolute.
/// Returns `None` when the result is not a well-formed absolute URL.
pub fn normalize_task_url(url: &str, credentials: &Credentials) -> Option<String> {
    let candidate = if url.starts_with('/') {
        format!("{}{}", credentials.app_origin(), url)
    } else {
        url.to_string()
    };

    is_valid_absolute_url(&candidate).then_some(candidate)
}

/// Whether `candidate` is a well-formed absolute URL.
///
/// The string must be plain printable ASCII; `http` and `https` URLs
/// additionally need a host made of non-empty labels.
pub fn is_valid_absolute_url(candidate: &str) -> bool {
    if candidate.is_empty()
        || !candidate.is_ascii()
        || candidate
            .chars()
            .any(|c| c.is_ascii_whitespace() || c.is_ascii_control())
    {
        return false;
    }

    let Ok(parsed) = Url::parse(candidate) else {
        return false;
    };

    match parsed.scheme() {
        "http" | "https" => parsed
            .host_str()
            .is_some_and(|host| !host.is_empty() && !host.split('.').any(str::is_empty)),
        _ => true,
    }
}
