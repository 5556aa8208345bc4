//! Base-URL client with one helper per HTTP verb.
//!
//! Paths are joined onto the base URL; absolute `http://` or `https://` URLs
//! pass through untouched. Every helper goes through
//! `RequestExecutor::execute`, so status validation and JSON parsing are the
//! same no matter which verb issued the request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{ClientSettings, RequestConfig};
use crate::error::RequestError;
use crate::executor::RequestExecutor;
use crate::http::HttpMethod;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    executor: Arc<RequestExecutor>,
}

impl ApiClient {
    pub fn new(base_url: &str, executor: Arc<RequestExecutor>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            executor,
        }
    }

    /// A reqwest-backed client using `settings` for the base URL and default
    /// headers.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let executor = RequestExecutor::with_reqwest()
            .with_default_headers(settings.default_headers.clone());
        Self::new(&settings.base_url, Arc::new(executor))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &RequestConfig,
    ) -> Result<T, RequestError> {
        self.executor.execute(&self.url(path), config).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request(path, &RequestConfig::new(HttpMethod::Get)).await
    }

    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let config = RequestConfig::new(HttpMethod::Post).json(payload)?;
        self.request(path, &config).await
    }

    pub async fn put<T, P>(&self, path: &str, payload: &P) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let config = RequestConfig::new(HttpMethod::Put).json(payload)?;
        self.request(path, &config).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request(path, &RequestConfig::new(HttpMethod::Delete)).await
    }
}
