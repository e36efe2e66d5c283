use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::generate_jwt;
use crate::error::ApiError;
use crate::model::User;
use crate::state::AppState;
use crate::validation::{validate_login, validate_register};

/// POST /register - Create a new account.
///
/// The password is stored only as a salted bcrypt hash; a duplicate username
/// surfaces as a conflict before anything is written.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let violations = validate_register(&body);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    // Safe after validation: both fields are known present strings.
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    let hashed = hash_password(password, state.auth.bcrypt_cost)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    let user = User::create(username.clone(), hashed);
    state.users.create(&user).await?;

    tracing::info!(username = %username, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "You may now login" })),
    ))
}

/// POST /login - Verify credentials and issue a signed token.
///
/// Unknown username and wrong password produce the same error so the endpoint
/// does not reveal which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let violations = validate_login(&body);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let user = state
        .users
        .by_username(username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(password, &user.password) {
        return Err(invalid_credentials());
    }

    let token = generate_jwt(&user, &state.auth)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "token": token,
    })))
}

fn invalid_credentials() -> ApiError {
    ApiError::bad_request("Username or password is invalid")
}
