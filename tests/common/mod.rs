#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use party_console::config::AppConfig;
use party_console::session::{MemoryTokenStore, Session};
use party_console::ApiClient;

pub const STORAGE_PREFIX: &str = "https://media.example.org/party";
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const ADMIN_ID: &str = "u-1";

/// One request as the mock API received it
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
struct MockState {
    collections: HashMap<String, Vec<Value>>,
    next_id: u64,
    failing: HashSet<String>,
    slow: HashMap<String, Duration>,
    reject_all: bool,
    seen: Vec<SeenRequest>,
    password_changes: Vec<Value>,
    upload_path: Option<String>,
    upload_bodies: Vec<Vec<u8>>,
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the remote content API
pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let app = Router::new().nest("/api", routes()).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock api")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            state,
        })
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::new(self.base_url.clone(), STORAGE_PREFIX)
    }

    pub fn client(&self, session: Arc<Session>) -> ApiClient {
        ApiClient::new(&self.config(), session)
    }

    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        state.collections.insert(resource.to_string(), records);
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state.collections.get(resource).cloned().unwrap_or_default()
    }

    pub fn fail(&self, resource: &str) {
        self.state.lock().unwrap().failing.insert(resource.to_string());
    }

    pub fn recover(&self, resource: &str) {
        self.state.lock().unwrap().failing.remove(resource);
    }

    /// Hold GET responses for `resource` back by `delay`
    pub fn slow(&self, resource: &str, delay: Duration) {
        self.state.lock().unwrap().slow.insert(resource.to_string(), delay);
    }

    pub fn reject_all(&self, reject: bool) {
        self.state.lock().unwrap().reject_all = reject;
    }

    pub fn set_upload_path(&self, path: &str) {
        self.state.lock().unwrap().upload_path = Some(path.to_string());
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.lock().unwrap().seen.clone()
    }

    pub fn seen_path(&self, method: &str, path: &str) -> Vec<SeenRequest> {
        self.seen()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn clear_seen(&self) {
        self.state.lock().unwrap().seen.clear();
    }

    pub fn password_changes(&self) -> Vec<Value> {
        self.state.lock().unwrap().password_changes.clone()
    }

    pub fn upload_bodies(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().upload_bodies.clone()
    }
}

pub fn isolated_session() -> Arc<Session> {
    Arc::new(Session::in_memory())
}

pub fn session_with_token(token: &str) -> Arc<Session> {
    Arc::new(Session::new(MemoryTokenStore::with_token(token)))
}

/// Token shaped like the ones the API issues
pub fn token_for(subject: &str) -> String {
    let claims = json!({
        "sub": subject,
        "username": ADMIN_USER,
        "exp": 4102444800i64,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"mock-secret"))
        .expect("failed to sign mock token")
}

/// Poll until `check` passes or the timeout elapses
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() > deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

fn routes() -> Router<Shared> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/change-password", post(change_password))
        .route("/upload", post(upload))
        .route("/:resource", get(list).post(create))
        .route("/:resource/:id", put(update).delete(remove))
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// Record the request and apply injected failures
fn gate(state: &Shared, method: &str, path: String, resource: Option<&str>, headers: &HeaderMap) -> Option<Response> {
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let mut state = state.lock().unwrap();
    state.seen.push(SeenRequest {
        method: method.to_string(),
        path,
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
    });

    if state.reject_all {
        return Some(error(StatusCode::UNAUTHORIZED, "Token expired"));
    }
    if let Some(resource) = resource {
        if state.failing.contains(resource) {
            return Some(error(StatusCode::INTERNAL_SERVER_ERROR, &format!("{} unavailable", resource)));
        }
        if resource == "accounts" && !headers.contains_key(AUTHORIZATION) {
            return Some(error(StatusCode::UNAUTHORIZED, "Authentication required"));
        }
    }
    None
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(rejected) = gate(&state, "POST", "/auth/login".into(), None, &headers) {
        return rejected;
    }
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
    if username == ADMIN_USER && password == ADMIN_PASSWORD {
        Json(json!({ "token": token_for(ADMIN_ID), "user": { "id": ADMIN_ID, "username": username } }))
            .into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn change_password(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Some(rejected) = gate(&state, "POST", "/auth/change-password".into(), None, &headers) {
        return rejected;
    }
    if !headers.contains_key(AUTHORIZATION) {
        return error(StatusCode::UNAUTHORIZED, "Authentication required");
    }
    if body.get("currentPassword").and_then(Value::as_str) != Some(ADMIN_PASSWORD) {
        return error(StatusCode::BAD_REQUEST, "Current password is incorrect");
    }
    state.lock().unwrap().password_changes.push(body);
    StatusCode::NO_CONTENT.into_response()
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(rejected) = gate(&state, "POST", "/upload".into(), None, &headers) {
        return rejected;
    }
    let is_multipart = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);
    if !is_multipart {
        return error(StatusCode::BAD_REQUEST, "Expected a multipart upload");
    }

    let mut state = state.lock().unwrap();
    state.upload_bodies.push(body.to_vec());
    let path = state.upload_path.clone().unwrap_or_else(|| "/abc.jpg".to_string());
    Json(json!({ "publicUrl": path })).into_response()
}

async fn list(State(state): State<Shared>, Path(resource): Path<String>, headers: HeaderMap) -> Response {
    if let Some(rejected) = gate(&state, "GET", format!("/{}", resource), Some(&resource), &headers) {
        return rejected;
    }
    let delay = state.lock().unwrap().slow.get(&resource).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let state = state.lock().unwrap();
    let records = state.collections.get(&resource).cloned().unwrap_or_default();
    Json(Value::Array(records)).into_response()
}

async fn create(
    State(state): State<Shared>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(rejected) = gate(&state, "POST", format!("/{}", resource), Some(&resource), &headers) {
        return rejected;
    }
    if resource == "news" {
        let title = body.get("title").and_then(Value::as_str).unwrap_or_default();
        if title.trim().is_empty() {
            return error(StatusCode::UNPROCESSABLE_ENTITY, "Title is required");
        }
    }

    let mut state = state.lock().unwrap();
    state.next_id += 1;
    // videos get numeric ids like an auto-increment table
    let id = if resource == "videos" {
        json!(state.next_id)
    } else {
        json!(format!("{}-{}", resource, state.next_id))
    };
    if let Some(obj) = body.as_object_mut() {
        obj.remove("password");
        obj.insert("id".to_string(), id);
    }
    state.collections.entry(resource).or_default().push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(rejected) = gate(&state, "PUT", format!("/{}/{}", resource, id), Some(&resource), &headers) {
        return rejected;
    }
    let mut state = state.lock().unwrap();
    let Some(records) = state.collections.get_mut(&resource) else {
        return error(StatusCode::NOT_FOUND, "Not found");
    };
    let Some(existing) = records.iter_mut().find(|r| id_matches(r, &id)) else {
        return error(StatusCode::NOT_FOUND, "Not found");
    };
    if let (Some(obj), Some(old_id)) = (body.as_object_mut(), existing.get("id").cloned()) {
        obj.insert("id".to_string(), old_id);
    }
    *existing = body.clone();
    Json(body).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path((resource, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejected) = gate(&state, "DELETE", format!("/{}/{}", resource, id), Some(&resource), &headers) {
        return rejected;
    }
    let mut state = state.lock().unwrap();
    let records = state.collections.entry(resource).or_default();
    let before = records.len();
    records.retain(|r| !id_matches(r, &id));
    if records.len() == before {
        return error(StatusCode::NOT_FOUND, "Not found");
    }
    StatusCode::NO_CONTENT.into_response()
}
