//! Single-request execution: build, send, validate, parse.
//!
//! # Design
//! `RequestExecutor` holds a transport and a set of default headers and
//! carries no other state between calls. `build_request` and
//! `parse_response` are pure, so URL/header/body construction and response
//! classification can be checked without a network. `execute` glues them
//! around one `Transport::send`. Nothing is retried: a POST or DELETE goes
//! out at most once per call.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::http::{merge_headers, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};

#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    default_headers: Vec<(String, String)>,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Executor over `transport` with `Content-Type: application/json` as the
    /// only default header.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    pub fn with_reqwest() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }

    pub fn with_default_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    pub fn build_request(&self, url: &str, config: &RequestConfig) -> Result<HttpRequest, RequestError> {
        let body = config
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RequestError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: config.method,
            path: url.to_string(),
            headers: merge_headers(&self.default_headers, &config.headers),
            body,
        })
    }

    pub async fn execute<T: DeserializeOwned>(
        &self,
        url: &str,
        config: &RequestConfig,
    ) -> Result<T, RequestError> {
        let request = self.build_request(url, config)?;
        debug!(method = %request.method, url = %request.path, "dispatching request");

        let result = match self.transport.send(request).await {
            Ok(response) => parse_response(response),
            Err(error) => Err(error),
        };
        if let Err(error) = &result {
            warn!(%url, %error, "request failed");
        }
        result
    }
}

/// Validate status and content type, then decode the body as JSON.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, RequestError> {
    check_status(&response)?;
    check_content_type(&response)?;
    serde_json::from_str(&response.body).map_err(|e| RequestError::Parse(e.to_string()))
}

/// Anything outside 200-299 is a failure; the body is not consulted.
fn check_status(response: &HttpResponse) -> Result<(), RequestError> {
    if response.is_success() {
        return Ok(());
    }
    Err(RequestError::http(response.status))
}

// A missing Content-Type falls through to the decoder.
fn check_content_type(response: &HttpResponse) -> Result<(), RequestError> {
    match response.header("content-type") {
        Some(value) if !is_json_media_type(value) => Err(RequestError::Parse(format!(
            "expected a JSON response, got content type {value}"
        ))),
        _ => Ok(()),
    }
}

fn is_json_media_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}
