//! Client-side data fetching with loading/error lifecycle tracking.
//!
//! # Overview
//! Three layers, leaf first:
//! - `RequestExecutor` performs one HTTP call through a `Transport`,
//!   rejects non-2xx statuses and non-JSON bodies, and classifies failures
//!   as `RequestError`.
//! - `FetchController` keeps one target URL plus an observable
//!   `RequestState` (`data`, `loading`, `error`), fetches automatically on
//!   creation and on target change, and supports manual refetch.
//! - `CrudFacade` maps create/read/update/remove onto one endpoint through an
//!   `ApiClient`, sharing a single loading/error pair across all four.
//!
//! # Design
//! - The network sits behind the `Transport` trait. `ReqwestTransport` is the
//!   production implementation; tests substitute scripted ones.
//! - Failures are reported twice: returned to the caller and mirrored into
//!   the owner's state as a message. Nothing is retried.
//! - A failed request never clears previously fetched `data`.
//! - Overlapping requests on one container resolve by `SettlePolicy`;
//!   the default reproduces last-settled-wins.

pub mod api_client;
pub mod config;
pub mod controller;
pub mod crud;
pub mod error;
pub mod executor;
pub mod http;
pub mod state;
pub mod transport;
pub mod types;

pub use api_client::ApiClient;
pub use config::{ClientSettings, RequestConfig};
pub use controller::FetchController;
pub use crud::{CrudFacade, CrudOperation, Endpoint};
pub use error::RequestError;
pub use executor::{parse_response, RequestExecutor};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{RequestState, SettlePolicy};
pub use transport::{ReqwestTransport, Transport};
pub use types::{NewPost, Post, User};
