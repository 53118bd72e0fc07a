//! In-memory users service used to exercise the probe client over real HTTP.
//!
//! Everything is mounted under `/api` so tests also cover base-URL path
//! prefixes. JSON routes live under `/api/users`, HTML/form routes under
//! `/api/pages/users`, and a few fixed routes produce echoes and failures.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Html,
    routing::{any, get},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserInput {
    pub name: String,
}

/// What the server saw, returned by `/api/echo/...`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<u64, User>,
    next_id: u64,
}

impl Store {
    fn insert(&mut self, name: String) -> User {
        self.next_id += 1;
        let user = User { id: self.next_id, name };
        self.users.insert(user.id, user.clone());
        user
    }

    fn upsert(&mut self, id: u64, name: String) -> User {
        self.next_id = self.next_id.max(id);
        let user = User { id, name };
        self.users.insert(id, user.clone());
        user
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Bytes served with a 500 by `/api/binary`; not valid UTF-8.
pub const BINARY_ERROR_BODY: &[u8] = &[0x89, b'P', b'N', b'G', 0xff, 0x00, 0xfe];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(put_user).delete(delete_user))
        .route("/pages/users", get(list_page).post(create_page))
        .route("/pages/users/{id}", get(user_page).put(update_page).delete(delete_page))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/binary", get(binary_error))
        .route("/malformed", get(malformed));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found(id: u64) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("user {id} not found"))
}

// JSON
//

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    let store = db.read().await;
    let mut users: Vec<User> = store.users.values().cloned().collect();
    users.sort_by_key(|u| u.id);
    Json(users)
}

async fn create_user(State(db): State<Db>, Json(input): Json<UserInput>) -> (StatusCode, Json<User>) {
    let user = db.write().await.insert(input.name);
    debug!(id = user.id, "created user");
    (StatusCode::CREATED, Json(user))
}

async fn get_user(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<User>, (StatusCode, String)> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or_else(|| not_found(id))
}

async fn put_user(State(db): State<Db>, Path(id): Path<u64>, Json(input): Json<UserInput>) -> Json<User> {
    let user = db.write().await.upsert(id, input.name);
    debug!(id, "stored user");
    Json(user)
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    db.write().await.users.remove(&id).ok_or_else(|| not_found(id))?;
    debug!(id, "deleted user");
    Ok(Json(serde_json::json!({ "result": "ok" })))
}

// HTML pages / forms
//

async fn list_page(State(db): State<Db>) -> Html<String> {
    let store = db.read().await;
    let mut names: Vec<&str> = store.users.values().map(|u| u.name.as_str()).collect();
    names.sort_unstable();
    Html(format!("<html><ul>{}</ul></html>", names.iter().map(|n| format!("<li>{n}</li>")).collect::<String>()))
}

async fn create_page(State(db): State<Db>, Form(input): Form<UserInput>) -> Result<Html<String>, (StatusCode, String)> {
    if input.name.trim().is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "<p>name is required</p>".to_string()));
    }
    let user = db.write().await.insert(input.name);
    debug!(id = user.id, "created user from form");
    Ok(Html(format!("<html>hi there, {}</html>", user.name)))
}

async fn user_page(State(db): State<Db>, Path(id): Path<u64>) -> Result<Html<String>, (StatusCode, String)> {
    let store = db.read().await;
    let user = store.users.get(&id).ok_or_else(|| not_found(id))?;
    Ok(Html(format!("<html>hi there, {}</html>", user.name)))
}

async fn update_page(State(db): State<Db>, Path(id): Path<u64>, Form(input): Form<UserInput>) -> Html<String> {
    let user = db.write().await.upsert(id, input.name);
    Html(format!("<html>updated {}</html>", user.name))
}

async fn delete_page(State(db): State<Db>, Path(id): Path<u64>) -> Result<Html<String>, (StatusCode, String)> {
    db.write().await.users.remove(&id).ok_or_else(|| not_found(id))?;
    Ok(Html("<html>deleted</html>".to_string()))
}

// Fixtures
//

async fn echo(method: Method, OriginalUri(uri): OriginalUri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(Echo {
        method: method.to_string(),
        uri: uri.to_string(),
        content_type: header_str(header::CONTENT_TYPE),
        accept: header_str(header::ACCEPT),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn binary_error() -> (StatusCode, &'static [u8]) {
    (StatusCode::INTERNAL_SERVER_ERROR, BINARY_ERROR_BODY)
}

async fn malformed() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], "{\"name\": ")
}
