use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePost {
    pub title: Option<String>,
    pub body: Option<String>,
    pub user_id: Option<u64>,
}

/// In-memory backing store. Post ids are handed out sequentially and never
/// reused, even after a delete.
#[derive(Debug)]
pub struct Store {
    pub posts: BTreeMap<u64, Post>,
    pub users: BTreeMap<u64, User>,
    next_post_id: u64,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            posts: BTreeMap::new(),
            users: BTreeMap::new(),
            next_post_id: 1,
        }
    }

    /// Three users and five posts, shaped like the JSONPlaceholder fixtures.
    pub fn seeded() -> Self {
        let mut store = Self::empty();
        let users = [
            (1, "Leanne Graham", "Sincere@april.biz"),
            (2, "Ervin Howell", "Shanna@melissa.tv"),
            (3, "Clementine Bauch", "Nathan@yesenia.net"),
        ];
        for (id, name, email) in users {
            store.users.insert(
                id,
                User {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                },
            );
        }
        for n in 1..=5u64 {
            store.insert_post(NewPost {
                title: format!("Seed post {n}"),
                body: format!("Body of seed post {n}"),
                user_id: (n % 3) + 1,
            });
        }
        store
    }

    pub fn insert_post(&mut self, input: NewPost) -> Post {
        let post = Post {
            id: self.next_post_id,
            user_id: input.user_id,
            title: input.title,
            body: input.body,
        };
        self.next_post_id += 1;
        self.posts.insert(post.id, post.clone());
        post
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::empty()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Router over the seeded store.
pub fn app() -> Router {
    app_with_store(Store::seeded())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    let store = db.read().await;
    Json(store.posts.values().cloned().collect())
}

async fn create_post(
    State(db): State<Db>,
    Json(input): Json<NewPost>,
) -> (StatusCode, Json<Post>) {
    let post = db.write().await.insert_post(input);
    (StatusCode::CREATED, Json(post))
}

async fn get_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Post>, StatusCode> {
    let store = db.read().await;
    store.posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdatePost>,
) -> Result<Json<Post>, StatusCode> {
    let mut store = db.write().await;
    let post = store.posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(body) = input.body {
        post.body = body;
    }
    if let Some(user_id) = input.user_id {
        post.user_id = user_id;
    }
    Ok(Json(post.clone()))
}

// JSONPlaceholder answers deletes with an empty object rather than 204.
async fn delete_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    store
        .posts
        .remove(&id)
        .map(|_| Json(json!({})))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    Json(store.users.values().cloned().collect())
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}
