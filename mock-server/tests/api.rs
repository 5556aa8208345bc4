use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_store, Post, Store, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_posts_returns_seed_data() {
    let resp = app().oneshot(empty_request("GET", "/posts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0].id, 1);
}

#[tokio::test]
async fn list_posts_empty_store() {
    let resp = app_with_store(Store::empty())
        .oneshot(empty_request("GET", "/posts"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn list_users_returns_seed_data() {
    let resp = app().oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 3);
    assert_eq!(users[0].name, "Leanne Graham");
}

// --- create ---

#[tokio::test]
async fn create_post_returns_201_with_generated_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/posts",
            r#"{"title":"New Post","body":"This is a new post created via API","userId":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Post = body_json(resp).await;
    assert_eq!(post.id, 6);
    assert_eq!(post.title, "New Post");
    assert_eq!(post.user_id, 1);
}

#[tokio::test]
async fn create_post_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/posts", r#"{"not_title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_post_without_json_content_type_returns_415() {
    let req = Request::builder()
        .method("POST")
        .uri("/posts")
        .header(http::header::CONTENT_TYPE, "text/plain")
        .body(r#"{"title":"t","body":"b","userId":1}"#.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// --- get ---

#[tokio::test]
async fn get_post_not_found() {
    let resp = app().oneshot(empty_request("GET", "/posts/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_post_bad_id_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/posts/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_by_id() {
    let resp = app().oneshot(empty_request("GET", "/users/2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.email, "Shanna@melissa.tv");
}

// --- update / delete ---

#[tokio::test]
async fn update_post_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/posts/999", r#"{"title":"Nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_post_not_found() {
    let resp = app().oneshot(empty_request("DELETE", "/posts/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app_with_store(Store::empty()).into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/posts",
            r#"{"title":"Walk dog","body":"around the block","userId":2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Post = body_json(resp).await;
    assert_eq!(created.title, "Walk dog");
    let id = created.id;

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Post = body_json(resp).await;
    assert_eq!(fetched, created);

    // update: only title
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("/posts/{id}"), r#"{"title":"Walk cat"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Post = body_json(resp).await;
    assert_eq!(updated.title, "Walk cat");
    assert_eq!(updated.body, "around the block"); // unchanged

    // delete answers an empty object
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({}));

    // get after delete: 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/posts/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete: empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/posts"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Post> = body_json(resp).await;
    assert!(posts.is_empty());
}
