#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get as route_get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use setuphub_api::config::{LogFormat, ServerConfig};
use setuphub_api::router::build_app_router;
use setuphub_api::state::AppState;
use setuphub_core::sanitize::canonical_id;
use setuphub_db::FakeEngagementStore;
use setuphub_upstream::http::build_client;
use setuphub_upstream::{HttpConfigClient, HttpIdentityClient};

/// An address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

// ---------------------------------------------------------------------------
// Upstream stub (configuration store + identity service)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StubData {
    configs: Vec<Value>,
    users: HashMap<String, Value>,
}

/// Canned upstream content served by [`Upstream::spawn`].
#[derive(Default)]
pub struct Upstream {
    data: StubData,
}

impl Upstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, doc: Value) -> Self {
        self.data.configs.push(doc);
        self
    }

    pub fn user(mut self, user_id: &str, username: &str) -> Self {
        self.data.users.insert(
            user_id.to_string(),
            json!({ "user_id": user_id, "username": username, "email": format!("{username}@example.com") }),
        );
        self
    }

    /// Serve on an ephemeral port; returns the base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/users/{id}", route_get(stub_user))
            .route("/configs/", route_get(stub_configs_by_game))
            .route("/configs/{id}", route_get(stub_config))
            .with_state(Arc::new(self.data));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn stub_user(State(data): State<Arc<StubData>>, Path(id): Path<String>) -> Response {
    match data.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stub_config(
    State(data): State<Arc<StubData>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("increment").map(String::as_str) != Some("false") {
        return (StatusCode::BAD_REQUEST, "aggregation reads must not increment").into_response();
    }
    let found = data
        .configs
        .iter()
        .find(|doc| canonical_id(&doc["_id"]).as_deref() == Some(id.as_str()));
    match found {
        Some(doc) => Json(doc.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stub_configs_by_game(
    State(data): State<Arc<StubData>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let needle = params.get("game").cloned().unwrap_or_default().to_lowercase();
    let docs: Vec<Value> = data
        .configs
        .iter()
        .filter(|doc| {
            doc["game"]
                .as_str()
                .is_some_and(|g| g.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    Json(docs).into_response()
}

/// A configuration document as the store returns it.
pub fn config_doc(id: &str, game: &str, title: &str, tags: &[&str], owner: &str, seq: u32) -> Value {
    json!({
        "_id": { "$oid": id },
        "game": game,
        "title": title,
        "description": format!("{title} build"),
        "parameters": { "difficulty": "hard" },
        "tags": tags,
        "user_id": owner,
        "created_at": format!("2024-05-01T10:{:02}:{:02}Z", seq / 60, seq % 60),
        "views": 0
    })
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` pointing both upstream services at `upstream`.
pub fn test_config(upstream: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 1,
        users_service_url: upstream.to_string(),
        configs_service_url: upstream.to_string(),
        upstream_timeout_secs: 2,
        enrich_concurrency: 4,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router, using the same middleware stack as
/// production, over the in-memory engagement store.
pub fn build_test_app(upstream: &str, store: FakeEngagementStore) -> Router {
    let config = test_config(upstream);
    let http = build_client(Duration::from_secs(config.upstream_timeout_secs)).unwrap();
    let configs = HttpConfigClient::new(http.clone(), &config.configs_service_url).unwrap();
    let identities = HttpIdentityClient::new(http, &config.users_service_url).unwrap();

    let state = AppState::new(config.clone(), Arc::new(store), Arc::new(configs), Arc::new(identities));
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// GET `uri` and return the status with the parsed body.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = get(app, uri).await;
    let status = response.status();
    (status, body_json(response).await)
}
