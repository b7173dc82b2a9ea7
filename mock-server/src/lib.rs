use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Seeded fixture account.
pub const FIXTURE_USERNAME: &str = "bob";
pub const FIXTURE_PASSWORD: &str = "pw";
pub const FIXTURE_EMAIL: &str = "bob@x.com";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginUser {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub username: String,
    pub email: String,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<u32, Account>,
    tokens: HashMap<String, u32>,
    uploads: HashMap<String, (String, Vec<u8>)>,
    next_id: u32,
}

impl Store {
    pub fn add_user(&mut self, username: &str, password: &str, email: &str) -> u32 {
        self.next_id += 1;
        self.accounts.insert(
            self.next_id,
            Account {
                user: User {
                    username: username.to_string(),
                    email: email.to_string(),
                    avatar: None,
                },
                password: password.to_string(),
            },
        );
        self.next_id
    }

    fn find_by_username(&self, username: &str) -> Option<(u32, &Account)> {
        self.accounts
            .iter()
            .find(|(_, a)| a.user.username == username)
            .map(|(id, a)| (*id, a))
    }
}

pub type Db = Arc<RwLock<Store>>;

/// JSON error body of the shape `{ "message": ... }`.
pub struct ApiFailure(StatusCode, String);

impl ApiFailure {
    fn new(status: StatusCode, message: &str) -> Self {
        Self(status, message.to_string())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

pub fn app() -> Router {
    let mut store = Store::default();
    store.add_user(FIXTURE_USERNAME, FIXTURE_PASSWORD, FIXTURE_EMAIL);
    app_with_store(store)
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/auth/login", post(login))
        .route("/users", put(update_user))
        .route("/users/token", get(current_user))
        .route("/users/avatar", post(upload_avatar))
        .route("/uploads/{filename}", get(get_upload))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn login(State(db): State<Db>, Json(input): Json<LoginUser>) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut store = db.write().await;
    let (id, user) = match store.find_by_username(&input.username) {
        Some((id, account)) if account.password == input.password => (id, account.user.clone()),
        _ => {
            tracing::info!(username = %input.username, "rejected login");
            return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Incorrect username/password"));
        }
    };
    let token = Uuid::new_v4().to_string();
    store.tokens.insert(token.clone(), id);
    tracing::info!(username = %user.username, "issued token");
    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "data": user,
    })))
}

/// Resolve the Bearer token in `headers` to an account id.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<u32, ApiFailure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "No token provided"))?;
    store
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| ApiFailure::new(StatusCode::UNAUTHORIZED, "Invalid token"))
}

async fn current_user(State(db): State<Db>, headers: HeaderMap) -> Result<Json<User>, ApiFailure> {
    let store = db.read().await;
    let id = authenticate(&store, &headers)?;
    let account = store
        .accounts
        .get(&id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(account.user.clone()))
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<UpdateUser>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut store = db.write().await;
    let id = authenticate(&store, &headers)?;
    if let Some((other, _)) = store.find_by_username(&input.username) {
        if other != id {
            return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Username already taken"));
        }
    }
    let account = store
        .accounts
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "User not found"))?;
    account.user.username = input.username;
    account.user.email = input.email;
    Ok(Json(json!({
        "message": "user updated",
        "data": account.user,
    })))
}

async fn upload_avatar(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let id = authenticate(&*db.read().await, &headers)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiFailure(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let original = field.file_name().unwrap_or("upload").to_string();
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiFailure(StatusCode::BAD_REQUEST, e.body_text()))?;
        upload = Some((original, mimetype, bytes.to_vec()));
    }
    let (original, mimetype, bytes) =
        upload.ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    let filename = match original.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!("{}.{ext}", Uuid::new_v4().simple()),
        _ => Uuid::new_v4().simple().to_string(),
    };
    let size = bytes.len();

    let mut store = db.write().await;
    let account = store
        .accounts
        .get_mut(&id)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "User not found"))?;
    account.user.avatar = Some(filename.clone());
    store.uploads.insert(filename.clone(), (mimetype.clone(), bytes));
    tracing::info!(%filename, size, "stored avatar");

    Ok(Json(json!({
        "message": "Avatar uploaded",
        "data": { "filename": filename, "mimetype": mimetype, "size": size },
    })))
}

async fn get_upload(State(db): State<Db>, Path(filename): Path<String>) -> Result<Response, ApiFailure> {
    let store = db.read().await;
    let (mimetype, bytes) = store
        .uploads
        .get(&filename)
        .cloned()
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "File not found"))?;
    Ok(([(header::CONTENT_TYPE, mimetype)], bytes).into_response())
}
