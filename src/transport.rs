// HTTP transport for the backend API.
//
// A thin seam over reqwest: issues the actual network calls, classifies
// response status, and splits bodies into JSON or text based on the
// content-type header. Controllers talk to the `Transport` trait so tests can
// substitute an in-memory implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Per-request options applied on top of the URL.
///
/// Part of the request identity: two fetches with the same URL but different
/// options are distinct requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Canonical fingerprint for identity comparison. Header order does not
    /// affect identity, so entries are sorted before joining.
    pub fn fingerprint(&self) -> String {
        let mut entries: Vec<String> = self
            .headers
            .iter()
            .map(|(k, v)| format!("{}:{}", k.to_ascii_lowercase(), v))
            .collect();
        entries.sort();
        entries.join("\n")
    }
}

// ---------------------------------------------------------------------------
// Response body
// ---------------------------------------------------------------------------

/// Parsed response payload.
///
/// A response is JSON iff its content-type contains `application/json`;
/// anything else is carried as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    /// Decode into a target type. Text bodies route through `Value::String`,
    /// so `String` targets consume plain-text endpoints directly.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T, ApiError> {
        let value = match self {
            Body::Json(v) => v,
            Body::Text(s) => Value::String(s),
        };
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// HTTP verb for write operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Post,
    Put,
    Delete,
}

impl WriteMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            WriteMethod::Post => reqwest::Method::POST,
            WriteMethod::Put => reqwest::Method::PUT,
            WriteMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// The network seam consumed by fetch and mutation operations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Body, ApiError>;

    /// Issue a write request with an optional JSON body.
    async fn send(
        &self,
        method: WriteMethod,
        url: &str,
        body: Option<Value>,
    ) -> Result<Body, ApiError>;
}

// ---------------------------------------------------------------------------
// Response interpretation
// ---------------------------------------------------------------------------

/// Turn a raw response into a `Body` or an `ApiError`.
///
/// Non-2xx always fails; when such a response carries a JSON body it is
/// parsed and attached so the caller can surface its `message` field. A 2xx
/// JSON content-type with an unparseable body is a `Parse` failure.
pub(crate) fn interpret_response(
    status: u16,
    status_text: &str,
    content_type: Option<&str>,
    body: &str,
) -> Result<Body, ApiError> {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

    if !(200..300).contains(&status) {
        let parsed = if is_json {
            serde_json::from_str::<Value>(body).ok()
        } else {
            None
        };
        return Err(ApiError::from_status(status, status_text, parsed));
    }

    if is_json {
        serde_json::from_str::<Value>(body)
            .map(Body::Json)
            .map_err(|e| ApiError::Parse(e.to_string()))
    } else {
        Ok(Body::Text(body.to_string()))
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Production transport over a shared reqwest client.
///
/// The cookie store is enabled so the backend session cookie set at login
/// rides along on every subsequent request.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpTransport { http })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Body, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        debug!(status = status.as_u16(), "response received");
        interpret_response(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            content_type.as_deref(),
            &text,
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, options: &RequestOptions) -> Result<Body, ApiError> {
        let mut request = self.http.get(url);
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        self.execute(request).await
    }

    async fn send(
        &self,
        method: WriteMethod,
        url: &str,
        body: Option<Value>,
    ) -> Result<Body, ApiError> {
        let mut request = self.http.request(method.as_reqwest(), url);
        if let Some(json) = body {
            request = request.json(&json);
        }
        self.execute(request).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
