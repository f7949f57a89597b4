//! Request signing.
//!
//! Requests carry the access key, a Unix timestamp and an HMAC-SHA256
//! signature over a canonical string:
//!
//! ```text
//! POST
//! /taskqueue/index.php
//! x-sae-accesskey:<access key>
//! x-sae-timestamp:<timestamp>
//! ```

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::Credentials;
use crate::error::QueueError;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_ACCESS_KEY: &str = "x-sae-accesskey";
pub const HEADER_TIMESTAMP: &str = "x-sae-timestamp";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const AUTH_SCHEME: &str = "SAEV1_HMAC_SHA256";

/// Headers produced by signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub access_key: String,
    pub timestamp: i64,
    /// Base64 of the raw HMAC digest.
    pub signature: String,
}

impl SignedHeaders {
    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", AUTH_SCHEME, self.signature)
    }

    /// All headers as name/value pairs, in emission order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (HEADER_ACCESS_KEY, self.access_key.clone()),
            (HEADER_TIMESTAMP, self.timestamp.to_string()),
            (HEADER_AUTHORIZATION, self.authorization()),
        ]
    }
}

/// Signs outgoing requests.
pub trait RequestSigner: Send + Sync {
    /// Sign `method uri_path` as of `timestamp` (Unix seconds).
    fn sign_at(
        &self,
        method: &str,
        uri_path: &str,
        timestamp: i64,
    ) -> Result<SignedHeaders, QueueError>;

    /// Sign `method uri_path` as of now.
    fn sign(&self, method: &str, uri_path: &str) -> Result<SignedHeaders, QueueError> {
        self.sign_at(method, uri_path, chrono::Utc::now().timestamp())
    }
}

/// The `SAEV1_HMAC_SHA256` scheme.
#[derive(Clone)]
pub struct HmacSha256Signer {
    access_key: String,
    secret_key: String,
}

impl HmacSha256Signer {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(credentials.access_key(), credentials.secret_key())
    }
}

impl std::fmt::Debug for HmacSha256Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSha256Signer")
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

impl RequestSigner for HmacSha256Signer {
    fn sign_at(
        &self,
        method: &str,
        uri_path: &str,
        timestamp: i64,
    ) -> Result<SignedHeaders, QueueError> {
        let canonical = canonical_string(method, uri_path, &self.access_key, timestamp);

        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| QueueError::Signing(e.to_string()))?;
        mac.update(canonical.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        Ok(SignedHeaders {
            access_key: self.access_key.clone(),
            timestamp,
            signature,
        })
    }
}

/// Build the string that gets signed. Signed headers are rendered as
/// `key:value`, sorted by key.
pub fn canonical_string(method: &str, uri_path: &str, access_key: &str, timestamp: i64) -> String {
    let signed: BTreeMap<&str, String> = BTreeMap::from([
        (HEADER_ACCESS_KEY, access_key.to_string()),
        (HEADER_TIMESTAMP, timestamp.to_string()),
    ]);

    let mut lines = vec![method.to_string(), uri_path.to_string()];
    lines.extend(signed.iter().map(|(k, v)| format!("{}:{}", k, v)));
    lines.join("\n")
}
