//! A persistent fetch target with observable `{data, loading, error}` state.
//!
//! # Design
//! `FetchController` remembers one URL and one `RequestConfig`. Creating it,
//! or pointing it at a different URL, starts a background fetch unless
//! `auto_fetch` is off. `fetch_data` and `refetch` run in the caller's task
//! and report every outcome twice: as the returned `Result`, and mirrored
//! into the shared state.
//!
//! Overlapping fetches are not deduplicated or cancelled. Under the default
//! `SettlePolicy::LastSettled` the final state belongs to whichever request
//! resolved last, not the one issued last. `SettlePolicy::LatestIssued`
//! changes that to "newest request wins".
//!
//! Background fetches are spawned on the ambient Tokio runtime and aborted
//! when the controller is dropped, so a discarded controller never receives
//! late data. A fetch whose future is dropped early, by abort or by a caller
//! giving up on `fetch_data`, still clears `loading`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::executor::RequestExecutor;
use crate::state::{RequestState, SettlePolicy, StateCell, Ticket};

pub struct FetchController<T> {
    executor: Arc<RequestExecutor>,
    url: String,
    config: RequestConfig,
    state: Arc<StateCell<T>>,
    background: Vec<JoinHandle<()>>,
}

impl<T> FetchController<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Create a controller and, if `config.auto_fetch` is set, start the
    /// first fetch. `loading` is already `true` when this returns.
    ///
    /// # Panics
    /// Auto-fetch spawns onto the current Tokio runtime and panics outside one.
    pub fn new(executor: Arc<RequestExecutor>, url: impl Into<String>, config: RequestConfig) -> Self {
        Self::with_policy(executor, url, config, SettlePolicy::default())
    }

    pub fn with_policy(
        executor: Arc<RequestExecutor>,
        url: impl Into<String>,
        config: RequestConfig,
        policy: SettlePolicy,
    ) -> Self {
        let mut controller = Self {
            executor,
            url: url.into(),
            config,
            state: Arc::new(StateCell::new(policy)),
            background: Vec::new(),
        };
        if controller.config.auto_fetch {
            controller.spawn_fetch();
        }
        controller
    }

    /// Fetch `url` with `config`, falling back to the configured target for
    /// either one left as `None`.
    pub async fn fetch_data(
        &self,
        url: Option<&str>,
        config: Option<&RequestConfig>,
    ) -> Result<T, RequestError> {
        let url = url.unwrap_or(self.url.as_str());
        let config = config.unwrap_or(&self.config);
        let ticket = self.state.begin();
        settle_fetch(&self.executor, &self.state, ticket, url, config).await
    }

    pub async fn refetch(&self) -> Result<T, RequestError> {
        self.fetch_data(None, None).await
    }

    /// Point the controller at `url`. Returns `true` if the target changed;
    /// a change triggers a fetch when auto-fetch is on.
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if url == self.url {
            return false;
        }
        self.url = url;
        if self.config.auto_fetch {
            self.spawn_fetch();
        }
        true
    }

    fn spawn_fetch(&mut self) {
        let ticket = self.state.begin();
        debug!(url = %self.url, "auto-fetch triggered");

        let executor = Arc::clone(&self.executor);
        let state = Arc::clone(&self.state);
        let url = self.url.clone();
        let config = self.config.clone();
        let handle = tokio::spawn(async move {
            // Already logged by the executor and mirrored into state.
            let _ = settle_fetch(&executor, &state, ticket, &url, &config).await;
        });

        self.background.retain(|h| !h.is_finished());
        self.background.push(handle);
    }

    pub fn state(&self) -> RequestState<T> {
        self.state.snapshot()
    }

    pub fn data(&self) -> Option<T> {
        self.state.with(|s| s.data.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }
}

impl<T> FetchController<T> {
    pub fn loading(&self) -> bool {
        self.state.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.state.with(|s| s.error.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn policy(&self) -> SettlePolicy {
        self.state.policy()
    }
}

impl<T> Drop for FetchController<T> {
    fn drop(&mut self) {
        for handle in &self.background {
            handle.abort();
        }
    }
}

async fn settle_fetch<T>(
    executor: &RequestExecutor,
    state: &StateCell<T>,
    ticket: Ticket,
    url: &str,
    config: &RequestConfig,
) -> Result<T, RequestError>
where
    T: DeserializeOwned + Clone,
{
    let pending = state.pending(ticket);
    let result = executor.execute::<T>(url, config).await;
    match &result {
        Ok(data) => pending.succeed(data.clone()),
        Err(error) => pending.fail(error.to_string()),
    };
    result
}
