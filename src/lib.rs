pub mod auth;
pub mod config;
pub mod error;
pub mod flatten;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;
pub mod store;
pub mod validation;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the full application router around an injected state. The protected
/// `/api/v1` surface sits behind the bearer-token middleware; registration,
/// login, and health stay public.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route(
            "/api/v1/assets",
            get(handlers::assets::list).post(handlers::assets::create),
        )
        .route(
            "/api/v1/assets/:id",
            get(handlers::assets::get)
                .patch(handlers::assets::patch)
                .delete(handlers::assets::delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Asset Vault API",
        "version": version,
        "endpoints": {
            "register": "POST /register (public)",
            "login": "POST /login (public)",
            "assets": "/api/v1/assets[/:id] (bearer token required)",
            "health": "GET /health (public)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.assets.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "store": "ok" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "timestamp": now, "store_error": e.to_string() })),
        ),
    }
}
