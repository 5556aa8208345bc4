//! Create/read/update/remove against one fixed endpoint.
//!
//! # Design
//! `CrudFacade` maps the four verbs onto an `ApiClient`:
//!
//! | operation | method | target |
//! |---|---|---|
//! | `create(payload)` | POST | `endpoint` |
//! | `read(None)` | GET | `endpoint` |
//! | `read(Some(id))` | GET | `endpoint/id` |
//! | `update(id, payload)` | PUT | `endpoint/id` |
//! | `remove(id)` | DELETE | `endpoint/id` |
//!
//! All four share a single `loading`/`error` pair. That pair is not isolated
//! per operation: a `remove` that fails while a `read` is still pending sets
//! `error` and clears `loading`, and the `read` settling afterwards clears
//! `error` again. `data` holds the `CrudOperation` that most recently
//! succeeded, so observers can tell which call the current flags came from.
//! The results themselves go only to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;

use crate::api_client::ApiClient;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::http::HttpMethod;
use crate::state::{RequestState, SettlePolicy, StateCell};

/// Base path for a collection resource, e.g. `/posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    pub fn base(&self) -> &str {
        &self.0
    }

    /// `endpoint/id` for a non-empty id, otherwise the base path.
    pub fn resolve(&self, id: Option<&str>) -> String {
        match id {
            Some(id) if !id.is_empty() => self.item(id),
            _ => self.0.clone(),
        }
    }

    pub fn item(&self, id: &str) -> String {
        format!("{}/{id}", self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

impl From<String> for Endpoint {
    fn from(base: String) -> Self {
        Self(base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOperation {
    Create,
    Read,
    Update,
    Remove,
}

pub struct CrudFacade {
    client: ApiClient,
    endpoint: Endpoint,
    state: StateCell<CrudOperation>,
}

impl CrudFacade {
    pub fn new(client: ApiClient, endpoint: impl Into<Endpoint>) -> Self {
        Self::with_policy(client, endpoint, SettlePolicy::default())
    }

    pub fn with_policy(client: ApiClient, endpoint: impl Into<Endpoint>, policy: SettlePolicy) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            state: StateCell::new(policy),
        }
    }

    pub async fn create<P, R>(&self, payload: &P) -> Result<R, RequestError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let config = RequestConfig::new(HttpMethod::Post).json(payload);
        self.track(CrudOperation::Create, self.endpoint.resolve(None), config)
            .await
    }

    pub async fn read<R: DeserializeOwned>(&self, id: Option<&str>) -> Result<R, RequestError> {
        let config = Ok(RequestConfig::new(HttpMethod::Get));
        self.track(CrudOperation::Read, self.endpoint.resolve(id), config)
            .await
    }

    pub async fn update<P, R>(&self, id: &str, payload: &P) -> Result<R, RequestError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let config = RequestConfig::new(HttpMethod::Put).json(payload);
        self.track(CrudOperation::Update, self.endpoint.item(id), config)
            .await
    }

    pub async fn remove<R: DeserializeOwned>(&self, id: &str) -> Result<R, RequestError> {
        let config = Ok(RequestConfig::new(HttpMethod::Delete));
        self.track(CrudOperation::Remove, self.endpoint.item(id), config)
            .await
    }

    // A payload that fails to serialize still passes through Pending, so the
    // failure is mirrored like any other.
    async fn track<R: DeserializeOwned>(
        &self,
        operation: CrudOperation,
        path: String,
        config: Result<RequestConfig, RequestError>,
    ) -> Result<R, RequestError> {
        let pending = self.state.pending(self.state.begin());
        let result = match config {
            Ok(config) => self.client.request(&path, &config).await,
            Err(error) => Err(error),
        };
        match &result {
            Ok(_) => pending.succeed(operation),
            Err(error) => pending.fail(error.to_string()),
        };
        result
    }

    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    /// The last operation that settled successfully.
    pub fn last_success(&self) -> Option<CrudOperation> {
        self.state.with(|s| s.data)
    }

    pub fn state(&self) -> RequestState<CrudOperation> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<CrudOperation>> {
        self.state.subscribe()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
