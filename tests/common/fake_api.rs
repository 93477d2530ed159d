//! Fake API v3 server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /api/v3/users`: HAL collection of the registered users
//! - `GET /api/v3/work_packages`: HAL collection of the registered work packages
//!
//! The `filters` parameter is recorded for every request. Conditions using
//! the `**` operator are applied as a case-insensitive substring match on
//! `name` / `subject`; every other condition is ignored.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeApi::start().await.unwrap();
//! api.add_user(4, "Bob Builder").await;
//! let service = HttpQueryService::new(&api.base_url()).unwrap();
//! ```

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub collection: &'static str,
    pub filters: Option<String>,
    pub page_size: Option<String>,
}

/// State shared between the router and test code.
#[derive(Default)]
struct ApiState {
    users: Vec<Value>,
    work_packages: Vec<Value>,
    requests: Vec<RecordedRequest>,
    /// When set, every request is answered with this status and no body.
    fail_status: Option<u16>,
    /// When set, returned verbatim with 200 instead of a collection.
    raw_body: Option<String>,
}

/// Handle to the running fake API server.
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/api/v3/users", get(list_users))
            .route("/api/v3/work_packages", get(list_work_packages))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn add_user(&self, id: u32, name: &str) {
        self.state.lock().await.users.push(json!({
            "_type": "User",
            "id": id,
            "name": name,
            "_links": { "self": { "href": format!("/api/v3/users/{id}"), "title": name } }
        }));
    }

    pub async fn add_work_package(&self, id: u32, subject: &str) {
        self.state.lock().await.work_packages.push(json!({
            "_type": "WorkPackage",
            "id": id,
            "subject": subject,
            "_links": { "self": { "href": format!("/api/v3/work_packages/{id}"), "title": subject } }
        }));
    }

    /// Answer every following request with `status`.
    pub async fn fail_with(&self, status: u16) {
        self.state.lock().await.fail_status = Some(status);
    }

    /// Answer every following request with `body` and status 200.
    pub async fn respond_raw(&self, body: &str) {
        self.state.lock().await.raw_body = Some(body.to_string());
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn list_users(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    respond(&state, "users", params).await
}

async fn list_work_packages(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    respond(&state, "work_packages", params).await
}

async fn respond(
    state: &Mutex<ApiState>,
    collection: &'static str,
    params: HashMap<String, String>,
) -> Response {
    let mut state = state.lock().await;
    state.requests.push(RecordedRequest {
        collection,
        filters: params.get("filters").cloned(),
        page_size: params.get("pageSize").cloned(),
    });

    if let Some(status) = state.fail_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "upstream exploded").into_response();
    }
    if let Some(body) = &state.raw_body {
        return (StatusCode::OK, body.clone()).into_response();
    }

    let elements = match collection {
        "users" => &state.users,
        _ => &state.work_packages,
    };
    let needle = params
        .get("filters")
        .and_then(|raw| search_needle(raw))
        .map(|n| n.to_lowercase());
    let matching: Vec<Value> = elements
        .iter()
        .filter(|el| match &needle {
            Some(needle) => ["name", "subject"].iter().any(|key| {
                el.get(*key)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(needle.as_str()))
            }),
            None => true,
        })
        .cloned()
        .collect();

    let body = json!({
        "_type": "Collection",
        "total": matching.len(),
        "count": matching.len(),
        "_embedded": { "elements": matching }
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/hal+json")],
        body.to_string(),
    )
        .into_response()
}

/// First value of the first `**` condition in a `filters` parameter.
fn search_needle(raw: &str) -> Option<String> {
    let filters: Vec<HashMap<String, Value>> = serde_json::from_str(raw).ok()?;
    filters.iter().flat_map(|f| f.values()).find_map(|cond| {
        if cond.get("operator")?.as_str()? == "**" {
            cond.get("values")?.get(0)?.as_str().map(str::to_string)
        } else {
            None
        }
    })
}
