// Shared test helpers. Not every test binary uses every helper, so
// dead_code warnings are suppressed at the module level.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use parlor_kernel::spawn_supervisor;
use parlor_server::modules::default_registry;
use parlor_server::{build_router, AppState, JwtConfig, ServerConfig};
use parlor_store::{spawn_persistence, GameRepository};

/// A `ServerConfig` with safe test defaults and a fixed signing secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        db_url: "sqlite::memory:".into(),
        db_user: None,
        db_pass: None,
        db_pool_size: 1,
        ask_timeout: Duration::from_secs(3),
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".into(),
            expiry_mins: 60,
        },
    }
}

/// An in-memory repository. One connection, so every statement sees the
/// same database; the persistence worker serializes access anyway.
pub async fn memory_repository() -> GameRepository {
    GameRepository::connect("sqlite::memory:", 1).await.unwrap()
}

/// Builds the full application over the given repository, waiting for
/// the supervisor's restore to finish. Building a second app over the
/// same repository simulates a process restart.
pub async fn build_app_with(repository: GameRepository) -> Router {
    repository.init().await.unwrap();
    let persistence = spawn_persistence(repository);
    let registry = Arc::new(default_registry());
    let supervisor = spawn_supervisor(Arc::clone(&registry), persistence);
    supervisor.ready().await.unwrap();

    let state = AppState {
        supervisor,
        registry,
        config: Arc::new(test_config()),
    };
    build_router(state)
}

/// Builds the app on a fresh in-memory store.
pub async fn build_test_app() -> Router {
    build_app_with(memory_repository().await).await
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Collects a response body into JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without auth.
pub async fn get(app: Router, uri: &str) -> axum::response::Response {
    send(app, Method::GET, uri, None, None).await
}

/// GET with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> axum::response::Response {
    send(app, Method::GET, uri, Some(token), None).await
}

/// POST JSON without auth.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// Empty-body POST with a bearer token.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> axum::response::Response {
    send(app, Method::POST, uri, Some(token), None).await
}

/// POST JSON with a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> axum::response::Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

// ---------------------------------------------------------------------------
// Domain helpers
// ---------------------------------------------------------------------------

/// Obtains a token for a fresh identity with the given name.
pub async fn register(app: &Router, name: &str) -> String {
    let response = post_json(
        app.clone(),
        "/auth/token",
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Creates a lobby for `host_token` and returns the game id.
pub async fn create_lobby(app: &Router, host_token: &str) -> String {
    let response = post_auth(app.clone(), "/lobby/create/tictactoe", host_token).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["gameId"].as_str().unwrap().to_string()
}

/// Creates, fills, and starts a two-player match. Returns the game id.
pub async fn start_match(app: &Router, host_token: &str, guest_token: &str) -> String {
    let game_id = create_lobby(app, host_token).await;
    let response = post_auth(app.clone(), &format!("/lobby/{game_id}/join"), guest_token).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let response = post_auth(app.clone(), &format!("/lobby/{game_id}/start"), host_token).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    game_id
}

/// Submits a move and returns the raw response.
pub async fn submit_move(
    app: &Router,
    token: &str,
    game_id: &str,
    row: usize,
    col: usize,
) -> axum::response::Response {
    post_json_auth(
        app.clone(),
        &format!("/tictactoe/{game_id}/move"),
        token,
        serde_json::json!({ "row": row, "col": col }),
    )
    .await
}
