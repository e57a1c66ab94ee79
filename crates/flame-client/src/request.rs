use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{ClientError, Result};

/// A single outbound API call: method, path, optional JSON body, optional token.
#[derive(Debug, Clone)]
pub struct Call<'a> {
    method: Method,
    path: &'a str,
    body: Option<Value>,
    token: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            body: None,
            token: None,
        }
    }

    pub fn get(path: &'a str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &'a str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &'a str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// What a successful response carried.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
    /// Body that was not valid JSON, passed through as-is.
    Text(String),
}

impl Payload {
    fn from_body(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    /// Decode into `T`. Empty decodes as `null`, raw text as a JSON string.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let value = match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Thin wrapper over `reqwest` with base-URL resolution and uniform errors.
///
/// One best-effort round trip per call: no retries, no timeout, no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        resolve_url(&self.base_url, path)
    }

    pub async fn call<T: DeserializeOwned>(&self, call: Call<'_>) -> Result<T> {
        self.call_raw(call).await?.decode()
    }

    pub async fn call_raw(&self, call: Call<'_>) -> Result<Payload> {
        let url = self.url(call.path);
        debug!("{} {}", call.method, url);

        let mut req = self
            .http
            .request(call.method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &call.body {
            req = req.body(serde_json::to_vec(body)?);
        }

        self.send(req, call.token).await
    }

    /// Multipart upload. Same error and decoding rules as `call`.
    pub async fn call_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        token: Option<&str>,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("POST {} (multipart)", url);

        let req = self.http.post(&url).multipart(form);
        self.send(req, token).await?.decode()
    }

    async fn send(&self, mut req: RequestBuilder, token: Option<&str>) -> Result<Payload> {
        req = req.header(CACHE_CONTROL, "no-store");
        if let Some(token) = token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = req.send().await?;
        read_response(resp).await
    }
}

async fn read_response(resp: Response) -> Result<Payload> {
    let status = resp.status();
    if !status.is_success() {
        // an unreadable error body still falls back to the status line
        let text = resp.text().await.unwrap_or_default();
        trace!("<- {} ({} bytes)", status, text.len());
        return Err(ClientError::Http {
            status,
            message: error_message(status, &text),
        });
    }

    let text = resp.text().await?;
    trace!("<- {} ({} bytes)", status, text.len());
    Ok(Payload::from_body(text))
}

/// Join `base` and `path`. An empty base keeps the path relative.
pub fn resolve_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if base.is_empty() {
        path
    } else {
        format!("{base}{path}")
    }
}

/// Human-readable message for a failed response.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(msg)) = map.get(key) {
                if !msg.trim().is_empty() {
                    return msg.clone();
                }
            }
        }
    }

    if !body.is_empty() {
        return body.to_string();
    }

    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}
