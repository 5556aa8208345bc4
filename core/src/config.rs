//! Per-request configuration and client-wide settings.

use serde::Serialize;
use serde_json::Value;

use crate::error::RequestError;
use crate::http::HttpMethod;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const BASE_URL_ENV: &str = "FETCH_BASE_URL";

/// How a single request is issued.
///
/// `auto_fetch` only matters to `FetchController`; the executor ignores it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub auto_fetch: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: None,
            auto_fetch: true,
        }
    }
}

impl RequestConfig {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `payload` into the request body.
    pub fn json<P: Serialize + ?Sized>(self, payload: &P) -> Result<Self, RequestError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| RequestError::Serialization(e.to_string()))?;
        Ok(self.body(body))
    }

    pub fn auto_fetch(mut self, enabled: bool) -> Self {
        self.auto_fetch = enabled;
        self
    }
}

/// Settings shared by every request an `ApiClient` makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, then overrides from `lookup`. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            settings.base_url = url.trim().to_string();
        }
        settings
    }
}
