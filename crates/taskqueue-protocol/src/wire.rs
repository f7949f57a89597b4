//! Wire-level request and response shapes.

use bytes::Bytes;
use url::form_urlencoded;

use crate::error::QueueError;
use crate::signer::RequestSigner;

/// Default backend origin.
pub const DEFAULT_BACKEND_URL: &str = "http://g.sinacloud.com";

/// Path every request is posted to and signed over.
pub const ENDPOINT_PATH: &str = "/taskqueue/index.php";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Header carrying `<code>,<message>` when the backend fails without a body.
pub const ERROR_HEADER: &str = "TaskQueueError";

/// Read-only queue length queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthQuery {
    /// Tasks still waiting to run.
    Current,
    /// Tasks that can still be added.
    Remaining,
}

impl LengthQuery {
    pub fn act(&self) -> &'static str {
        match self {
            LengthQuery::Current => "curlen",
            LengthQuery::Remaining => "leftlen",
        }
    }
}

/// Form fields for submitting a serialized batch.
pub fn push_form(batch_json: &str) -> Vec<(&'static str, String)> {
    vec![("taskqueue", batch_json.to_string())]
}

/// Form fields for a length query. `params` is the URL-encoded batch JSON,
/// which the form encoding then encodes a second time.
pub fn query_form(batch_json: &str, query: LengthQuery) -> Vec<(&'static str, String)> {
    let params: String = form_urlencoded::byte_serialize(batch_json.as_bytes()).collect();
    vec![("params", params), ("act", query.act().to_string())]
}

pub fn encode_form(fields: &[(&str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

/// A fully built, signed POST ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SignedRequest {
    /// Sign a form POST to [`ENDPOINT_PATH`] under `base_url`.
    pub fn post_form(
        base_url: &str,
        signer: &dyn RequestSigner,
        fields: &[(&str, String)],
    ) -> Result<Self, QueueError> {
        let signed = signer.sign("POST", ENDPOINT_PATH)?;

        let mut headers: Vec<(String, String)> = signed
            .to_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        headers.push(("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()));

        Ok(Self {
            url: endpoint_url(base_url),
            headers,
            body: encode_form(fields),
        })
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decoded value of a form field in the body.
    pub fn form_field(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.body.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), ENDPOINT_PATH)
}

/// What came back from one round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status, absent when no response was received.
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
    /// Set when the request itself failed (connect, TLS, timeout...).
    pub transport_error: Option<String>,
}

impl RawResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            headers,
            body: body.into(),
            transport_error: None,
        }
    }

    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            transport_error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
