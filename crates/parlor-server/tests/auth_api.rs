//! HTTP tests for token issuance and bearer authentication.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, build_test_app, get, get_auth, post_json, register};
use parlor_core::{Player, PlayerId};
use parlor_server::auth::issue_token;
use parlor_server::JwtConfig;

#[tokio::test]
async fn test_health_answers_ok() {
    let app = build_test_app().await;
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_token_issued_for_name_only() {
    let app = build_test_app().await;
    let response = post_json(app.clone(), "/auth/token", json!({ "name": "alice" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!token.is_empty());

    let response = get_auth(app, "/auth/whoami", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "alice");
    // The minted id is a UUID.
    assert!(json["id"].as_str().unwrap().parse::<PlayerId>().is_ok());
}

#[tokio::test]
async fn test_token_keeps_supplied_id() {
    let app = build_test_app().await;
    let id = PlayerId::random().to_string();
    let response = post_json(
        app.clone(),
        "/auth/token",
        json!({ "id": id, "name": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let json = body_json(get_auth(app, "/auth/whoami", &token).await).await;
    assert_eq!(json["id"], id.as_str());
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = build_test_app().await;
    let response = post_json(
        app,
        "/auth/token",
        json!({ "id": "not-a-uuid", "name": "alice" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_whoami_requires_token() {
    let app = build_test_app().await;
    let response = get(app, "/auth/whoami").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = build_test_app().await;
    let response = get_auth(app, "/auth/whoami", "definitely.not.valid").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let app = build_test_app().await;
    let rogue = JwtConfig {
        secret: "some-other-secret-entirely".into(),
        expiry_mins: 60,
    };
    let forged = issue_token(&Player::new(PlayerId::random(), "mallory"), &rogue).unwrap();

    let response = get_auth(app, "/auth/whoami", &forged).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_with_non_uuid_identity_rejected() {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let app = build_test_app().await;
    // Correctly signed, but the identity claim is not a UUID.
    let now = chrono::Utc::now().timestamp();
    let claims = parlor_server::auth::Claims {
        id: "root".into(),
        name: "mallory".into(),
        iat: now,
        exp: now + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(common::test_config().jwt.secret.as_bytes()),
    )
    .unwrap();

    let response = get_auth(app, "/auth/whoami", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_endpoints_reject_missing_auth() {
    let app = build_test_app().await;
    let token = register(&app, "alice").await;
    let game_id = common::create_lobby(&app, &token).await;

    for uri in [
        "/lobby/create/tictactoe".to_string(),
        format!("/lobby/{game_id}/join"),
        format!("/lobby/{game_id}/leave"),
        format!("/lobby/{game_id}/start"),
    ] {
        let response = common::post_json(app.clone(), &uri, json!({})).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "POST {uri}");
    }
}
