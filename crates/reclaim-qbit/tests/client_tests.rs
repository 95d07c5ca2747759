//! Integration tests for the qBittorrent client
//!
//! A small axum app stands in for the Web UI: it hands out a session cookie
//! on login and answers 403 to any listing without it.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use reclaim_domain::traits::TorrentClient;
use reclaim_domain::ItemId;
use reclaim_qbit::{QbitClient, QbitError};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const SESSION: &str = "SID=test-session";

#[derive(Clone, Default)]
struct FakeQbit {
    logins: Arc<Mutex<usize>>,
    deletions: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn authenticated(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION))
}

async fn login(State(state): State<FakeQbit>, Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    *state.logins.lock().unwrap() += 1;

    if form.get("username").map(String::as_str) == Some("admin")
        && form.get("password").map(String::as_str) == Some("secret")
    {
        ([(header::SET_COOKIE, format!("{}; path=/", SESSION))], "Ok.").into_response()
    } else {
        "Fails.".into_response()
    }
}

async fn torrents(headers: HeaderMap) -> impl IntoResponse {
    if !authenticated(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }

    Json(serde_json::json!([
        {
            "hash": "aaa",
            "name": "Show.S01",
            "category": "TV",
            "size": 4000000000u64,
            "seeding_time": 1209600,
            "ratio": 1.25,
            "state": "stalledUP",
            "progress": 1.0
        },
        {
            "hash": "bbb",
            "name": "Movie.2024",
            "category": "movies",
            "size": 8000000000u64,
            "seeding_time": 0,
            "ratio": 0.0,
            "state": "downloading",
            "progress": 0.5
        },
        { "name": "no hash here" }
    ]))
    .into_response()
}

async fn delete(
    State(state): State<FakeQbit>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authenticated(&headers) {
        return StatusCode::FORBIDDEN;
    }
    state.deletions.lock().unwrap().push(form);
    StatusCode::OK
}

async fn spawn_fake() -> (SocketAddr, FakeQbit) {
    let state = FakeQbit::default();
    let app = Router::new()
        .route("/api/v2/auth/login", post(login))
        .route("/api/v2/torrents/info", get(torrents))
        .route("/api/v2/torrents/delete", post(delete))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

#[tokio::test]
async fn test_list_logs_in_on_forbidden() {
    let (addr, state) = spawn_fake().await;
    let client = QbitClient::new(format!("http://{}", addr), "admin", "secret").unwrap();

    let items = client.list_items().await.unwrap();

    assert_eq!(*state.logins.lock().unwrap(), 1);
    assert_eq!(items.len(), 2, "record without hash is rejected");
    assert_eq!(items[0].id, ItemId::new("aaa"));
    assert_eq!(items[0].category, "TV");
    assert!((items[1].remaining_download_gb() - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_session_is_reused() {
    let (addr, state) = spawn_fake().await;
    let client = QbitClient::new(format!("http://{}", addr), "admin", "secret").unwrap();

    client.login().await.unwrap();
    client.list_items().await.unwrap();
    client.list_items().await.unwrap();

    assert_eq!(*state.logins.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_bad_credentials() {
    let (addr, _state) = spawn_fake().await;
    let client = QbitClient::new(format!("http://{}", addr), "admin", "wrong").unwrap();

    match client.list_items().await {
        Err(QbitError::Auth(_)) => {}
        other => panic!("Expected Auth error, got {:?}", other.map(|items| items.len())),
    }
}

#[tokio::test]
async fn test_delete_sends_hash_and_flag() {
    let (addr, state) = spawn_fake().await;
    let client = QbitClient::new(format!("http://{}", addr), "admin", "secret").unwrap();
    client.login().await.unwrap();

    client.delete_item(&ItemId::new("aaa"), true).await.unwrap();
    client.delete_item(&ItemId::new("bbb"), false).await.unwrap();

    let deletions = state.deletions.lock().unwrap();
    assert_eq!(deletions.len(), 2);
    assert_eq!(deletions[0]["hashes"], "aaa");
    assert_eq!(deletions[0]["deleteFiles"], "true");
    assert_eq!(deletions[1]["deleteFiles"], "false");
}

#[tokio::test]
async fn test_delete_without_session_is_forbidden() {
    let (addr, _state) = spawn_fake().await;
    let client = QbitClient::new(format!("http://{}", addr), "admin", "secret").unwrap();

    let result = client.delete_item(&ItemId::new("aaa"), true).await;
    assert!(matches!(result, Err(QbitError::Forbidden)));
}
