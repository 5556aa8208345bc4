//! DTOs for the JSONPlaceholder-style resources served by the demo backend.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently, so
//! the core never depends on axum. The end-to-end tests catch any schema
//! drift between the two crates.

use serde::{Deserialize, Serialize};

/// A post as returned by `/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Payload for creating a post. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}
