use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn multipart_request(token: &str, field: &str, file_name: &str, bytes: &[u8]) -> Request<axum::body::Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n--XBOUNDARY--\r\n");
    Request::builder()
        .method("POST")
        .uri("/users/avatar")
        .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(axum::body::Body::from(body))
        .unwrap()
}

async fn login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/auth/login", None, r#"{"username":"bob","password":"pw"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

// --- login ---

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/auth/login", None, r#"{"username":"bob","password":"pw"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["username"], "bob");
    assert_eq!(body["data"]["email"], "bob@x.com");
}

#[tokio::test]
async fn login_wrong_password_returns_401_with_message() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/auth/login", None, r#"{"username":"bob","password":"nope"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Incorrect username/password");
}

#[tokio::test]
async fn login_malformed_json_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/auth/login", None, r#"{"username":"bob"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- current user ---

#[tokio::test]
async fn current_user_with_token() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/users/token")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let user: User = body_json(resp).await;
    assert_eq!(user.username, "bob");
    assert!(user.avatar.is_none());
}

#[tokio::test]
async fn current_user_without_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/users/token").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "No token provided");
}

#[tokio::test]
async fn current_user_with_unknown_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/users/token")
                .header(http::header::AUTHORIZATION, "Bearer not-a-token")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "Invalid token");
}

// --- update ---

#[tokio::test]
async fn update_user_changes_fields() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/users",
            Some(&token),
            r#"{"username":"a","email":"a@x.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["data"]["username"], "a");
    assert_eq!(body["data"]["email"], "a@x.com");

    // The token stays bound to the renamed account.
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/users/token")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let user: User = body_json(resp).await;
    assert_eq!(user.username, "a");
}

#[tokio::test]
async fn update_user_without_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(json_request("PUT", "/users", None, r#"{"username":"a","email":"a@x.com"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- avatar ---

#[tokio::test]
async fn upload_avatar_sets_avatar_and_serves_file() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .clone()
        .oneshot(multipart_request(&token, "avatar", "me.png", &[137, 80, 78, 71]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".png"));
    assert_eq!(body["data"]["size"], 4);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/token")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let user: User = body_json(resp).await;
    assert_eq!(user.avatar.as_deref(), Some(filename.as_str()));

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{filename}"))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await.as_ref(), &[137, 80, 78, 71]);
}

#[tokio::test]
async fn upload_without_avatar_field_returns_400() {
    let app = app();
    let token = login(&app).await;
    let resp = app
        .oneshot(multipart_request(&token, "picture", "me.png", b"x"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn unknown_upload_returns_404() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/uploads/missing.png").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
