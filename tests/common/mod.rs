#![allow(dead_code)]

use std::sync::Arc;

use asset_vault_api::config::AuthConfig;
use asset_vault_api::state::AppState;
use asset_vault_api::store::memory::MemoryStore;
use asset_vault_api::store::{AssetStore, UserStore};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

/// The application wired against an in-memory store, plus direct handles for
/// asserting on stored state.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<AuthConfig>,
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "integration-test-secret".to_string(),
        jwt_issuer: "asset-vault-api".to_string(),
        jwt_audience: "asset-vault-clients".to_string(),
        jwt_expiry_hours: 1,
        // minimum bcrypt cost, to keep the tests fast
        bcrypt_cost: 4,
    }
}

pub fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let assets: Arc<dyn AssetStore> = store.clone();
    let users: Arc<dyn UserStore> = store.clone();
    let auth = Arc::new(test_auth_config());
    let state = AppState { assets, users, auth: auth.clone() };

    TestApp {
        router: asset_vault_api::app(state),
        store,
        auth,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .expect("request build"),
            None => builder.body(Body::empty()).expect("request build"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is JSON")
        };
        (status, json)
    }

    /// Register an account and log in, returning the issued bearer token.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/register",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let (status, body) = self
            .request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }
}

pub fn sample_asset_body() -> Value {
    json!({
        "title": "Granite Rocks Pack",
        "description": "Photoscanned granite boulders",
        "images": [
            { "url": "https://cdn.example.com/rocks.png", "height": 512, "width": 512, "type": "thumbnail" }
        ],
        "type": "3D Asset",
        "tags": [
            { "name": "rock", "path": "/nature/rock" },
            { "name": "scan", "path": "/workflow/scan" }
        ],
        "category": "UE4"
    })
}
