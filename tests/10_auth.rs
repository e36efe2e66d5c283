mod common;

use asset_vault_api::auth::generate_jwt;
use asset_vault_api::model::User;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{sample_asset_body, spawn_app, test_auth_config};

#[tokio::test]
async fn register_rejects_short_password() {
    let app = spawn_app();

    let (status, body) = app
        .request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "username": "newplayer", "password": "1234567" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password"].is_string());
}

#[tokio::test]
async fn register_rejects_out_of_range_username() {
    let app = spawn_app();

    for username in ["short", "this-username-is-way-too-long"] {
        let (status, body) = app
            .request(
                Method::POST,
                "/register",
                None,
                Some(json!({ "username": username, "password": "12345678" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["field_errors"]["username"].is_string());
    }
}

#[tokio::test]
async fn register_stores_a_salted_hash_not_the_plaintext() {
    let app = spawn_app();

    let (status, _) = app
        .request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "username": "newplayer", "password": "12345678" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let stored = app.store.stored_user("newplayer").expect("user persisted");
    assert_ne!(stored.password, "12345678");
    assert!(stored.password.starts_with("$2"), "expected a bcrypt hash");
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let app = spawn_app();
    let creds = json!({ "username": "newplayer", "password": "12345678" });

    let (status, _) = app
        .request(Method::POST, "/register", None, Some(creds.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.request(Method::POST, "/register", None, Some(creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn login_round_trip_returns_token_without_password() {
    let app = spawn_app();
    app.register_and_login("newplayer", "12345678").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "newplayer", "password": "12345678" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "newplayer");
    assert!(body["token"].is_string());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_fail_identically() {
    let app = spawn_app();
    app.register_and_login("newplayer", "12345678").await;

    let (status, wrong_pw) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "newplayer", "password": "87654321" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown) = app
        .request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": "whoisthis", "password": "12345678" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(wrong_pw["message"], unknown["message"]);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = spawn_app();

    let (status, body) = app
        .request(Method::GET, "/api/v1/assets", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/assets",
            None,
            Some(sample_asset_body()),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.asset_count(), 0);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = spawn_app();

    let (status, _) = app
        .request(Method::GET, "/api/v1/assets", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_wrong_audience_is_rejected() {
    let app = spawn_app();
    app.register_and_login("newplayer", "12345678").await;
    let user = app.store.stored_user("newplayer").unwrap();

    // Signed with the right secret but bound to a different audience.
    let mut other = test_auth_config();
    other.jwt_audience = "some-other-service".to_string();
    let token = generate_jwt(&user, &other).unwrap();

    let (status, _) = app
        .request(Method::GET, "/api/v1/assets", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_a_missing_user_is_rejected() {
    let app = spawn_app();

    // Valid signature, but the subject was never registered.
    let ghost = User::create("ghostwriter".to_string(), "irrelevant".to_string());
    let token = generate_jwt(&ghost, &test_auth_config()).unwrap();

    let (status, _) = app
        .request(Method::GET, "/api/v1/assets", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_the_resource() {
    let app = spawn_app();
    let token = app.register_and_login("newplayer", "12345678").await;

    let (status, body) = app
        .request(Method::GET, "/api/v1/assets", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
