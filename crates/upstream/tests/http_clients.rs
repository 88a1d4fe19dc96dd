//! Client behaviour against an in-process stub of the remote services.

use std::collections::HashMap;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use setuphub_core::error::CoreError;
use setuphub_upstream::http::build_client;
use setuphub_upstream::identity::UNKNOWN_USERNAME;
use setuphub_upstream::{ConfigLookup, HttpConfigClient, HttpIdentityClient, IdentityLookup, UpstreamError};

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

async fn user(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "u1" => Json(json!({ "user_id": "u1", "username": "alice", "email": "alice@example.com" }))
            .into_response(),
        "blank" => Json(json!({ "user_id": "blank", "username": "  " })).into_response(),
        "garbled" => (StatusCode::OK, "<html>").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "username": "late" })).into_response()
        }
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn config(Path(id): Path<String>, Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("increment").map(String::as_str) != Some("false") {
        return (StatusCode::BAD_REQUEST, "increment=false required").into_response();
    }
    match id.as_str() {
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "db down").into_response(),
        other => Json(json!({ "_id": other, "game": "StarCraft II", "title": "t", "user_id": "u1" }))
            .into_response(),
    }
}

async fn configs_by_game(Query(params): Query<HashMap<String, String>>) -> Response {
    let game = params.get("game").cloned().unwrap_or_default();
    match game.as_str() {
        "boom" => return (StatusCode::BAD_GATEWAY, "index offline").into_response(),
        "garbled" => return (StatusCode::OK, "<html>").into_response(),
        _ => {}
    }
    let docs: Vec<_> = ["StarCraft II", "StarCraft: Brood War", "Age of Empires II"]
        .iter()
        .enumerate()
        .filter(|(_, g)| g.to_lowercase().contains(&game.to_lowercase()))
        .map(|(i, g)| json!({ "_id": { "$oid": format!("id{i}") }, "game": g }))
        .collect();
    Json(docs).into_response()
}

async fn spawn_stub() -> String {
    let app = Router::new()
        .route("/users/{id}", get(user))
        .route("/configs/", get(configs_by_game))
        .route("/configs/{id}", get(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    build_client(Duration::from_millis(500)).unwrap()
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolves_known_user() {
    let base = spawn_stub().await;
    let identities = HttpIdentityClient::new(client(), &base).unwrap();

    let identity = identities.resolve("u1").await;
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn every_identity_failure_resolves_to_sentinel() {
    let base = spawn_stub().await;
    let identities = HttpIdentityClient::new(client(), &base).unwrap();

    for user_id in ["nobody", "blank", "garbled", "slow", "broken", ""] {
        let identity = identities.resolve(user_id).await;
        assert_eq!(identity.username, UNKNOWN_USERNAME, "user {user_id:?}");
    }
}

#[tokio::test]
async fn slow_identity_service_times_out() {
    let base = spawn_stub().await;
    let identities = HttpIdentityClient::new(client(), &base).unwrap();

    let err = identities.fetch("slow").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err}");
}

#[tokio::test]
async fn unreachable_identity_service_resolves_to_sentinel() {
    let identities = HttpIdentityClient::new(client(), "http://127.0.0.1:9").unwrap();
    assert_eq!(identities.resolve("u1").await.username, UNKNOWN_USERNAME);
}

// ---------------------------------------------------------------------------
// Configurations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_configuration_without_incrementing_views() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();

    let doc = configs.get_by_id("cfg-1").await.unwrap().unwrap();
    assert_eq!(doc["_id"], "cfg-1");
}

#[tokio::test]
async fn path_segments_are_percent_encoded() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();

    let doc = configs.get_by_id("a b/c").await.unwrap().unwrap();
    assert_eq!(doc["_id"], "a b/c");
}

#[tokio::test]
async fn missing_configuration_is_none() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();
    assert!(configs.get_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn server_error_is_unavailability() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();

    let err = configs.get_by_id("boom").await.unwrap_err();
    assert_matches!(err, UpstreamError::Status { status: 500, ref body, .. } if body == "db down");
    assert_matches!(CoreError::from(err), CoreError::ServiceUnavailable(_));
}

#[tokio::test]
async fn unreachable_store_is_a_request_error() {
    let configs = HttpConfigClient::new(client(), "http://127.0.0.1:9").unwrap();
    assert_matches!(configs.get_by_id("cfg-1").await, Err(UpstreamError::Request(_)));
    assert_matches!(configs.list_by_game("x").await, Err(UpstreamError::Request(_)));
}

#[tokio::test]
async fn lists_by_game_substring() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();

    let docs = configs.list_by_game("starcraft").await.unwrap();
    assert_eq!(docs.len(), 2);
    assert!(configs.list_by_game("quake").await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_failures_are_status_or_decode_errors() {
    let base = spawn_stub().await;
    let configs = HttpConfigClient::new(client(), &base).unwrap();

    assert_matches!(
        configs.list_by_game("boom").await,
        Err(UpstreamError::Status { status: 502, ref body, .. }) if body == "index offline"
    );
    assert_matches!(configs.list_by_game("garbled").await, Err(UpstreamError::Decode(_)));
}
