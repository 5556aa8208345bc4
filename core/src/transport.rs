//! The I/O seam between the executor and the network.
//!
//! `RequestExecutor` hands a fully built `HttpRequest` to a `Transport` and
//! gets back whatever the server said, as data. Status interpretation stays in
//! the executor, so a transport must return 4xx/5xx responses as `Ok`, and
//! only report `RequestError::Network` when no response arrived. A request
//! that cannot even be built is `RequestError::InvalidRequest`.

use async_trait::async_trait;

use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let mut builder = self.client.request(request.method.into(), &request.path);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(send_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(send_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn send_error(error: reqwest::Error) -> RequestError {
    if error.is_builder() {
        RequestError::InvalidRequest(error.to_string())
    } else {
        RequestError::Network(error.to_string())
    }
}
