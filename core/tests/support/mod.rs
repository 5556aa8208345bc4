//! Transport doubles shared by the integration tests.
//!
//! `ScriptedTransport` answers from a queue immediately. `GatedTransport`
//! parks every request until the test releases it, which makes settlement
//! order fully controllable.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fetch_core::{HttpRequest, HttpResponse, RequestError, RequestExecutor, Transport};
use serde_json::Value;
use tokio::sync::oneshot;

pub fn json_ok(body: Value) -> HttpResponse {
    json_status(200, body)
}

pub fn json_status(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub fn executor<T: Transport + 'static>(transport: &Arc<T>) -> Arc<RequestExecutor> {
    let transport: Arc<dyn Transport> = transport.clone();
    Arc::new(RequestExecutor::new(transport))
}

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, RequestError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<HttpResponse, RequestError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RequestError::Network("no scripted response".to_string())))
    }
}

#[derive(Default)]
pub struct GatedTransport {
    pending: Mutex<Vec<(HttpRequest, oneshot::Sender<HttpResponse>)>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn is_pending(&self, path: &str) -> bool {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .any(|(req, _)| req.path == path)
    }

    /// Yield until a request for `path` is parked.
    pub async fn wait_for_request(&self, path: &str) {
        for _ in 0..10_000 {
            if self.is_pending(path) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no request for {path} arrived");
    }

    /// Answer the oldest parked request for `path`. Returns `false` when the
    /// requester has gone away.
    pub fn release(&self, path: &str, response: HttpResponse) -> bool {
        let tx = {
            let mut pending = self.pending.lock().unwrap();
            let idx = pending
                .iter()
                .position(|(req, _)| req.path == path)
                .unwrap_or_else(|| panic!("no pending request for {path}"));
            pending.remove(idx).1
        };
        tx.send(response).is_ok()
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let (tx, rx) = oneshot::channel();
        self.seen.lock().unwrap().push(request.clone());
        self.pending.lock().unwrap().push((request, tx));
        rx.await
            .map_err(|_| RequestError::Network("gate closed".to_string()))
    }
}
