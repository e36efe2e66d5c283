use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::flatten::flatten;
use crate::middleware::auth::AuthUser;
use crate::model::{Asset, AssetKind, Category, Image, Tag};
use crate::state::AppState;
use crate::validation::{validate_asset_create, validate_asset_patch};

/// Create-request body after validation. `id` and `addedAt` are always
/// server-set and not accepted from the caller.
#[derive(Debug, Deserialize)]
struct CreateAsset {
    title: String,
    description: String,
    images: Vec<Image>,
    #[serde(rename = "type")]
    kind: AssetKind,
    tags: Vec<Tag>,
    category: Category,
}

/// GET /api/v1/assets - Full listing.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Asset>>, ApiError> {
    let assets = state.assets.find_all().await?;
    Ok(Json(assets))
}

/// GET /api/v1/assets/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Asset>, ApiError> {
    let asset = state
        .assets
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No asset with id '{}'", id)))?;
    Ok(Json(asset))
}

/// POST /api/v1/assets - Validate and create; nothing reaches the store on a
/// validation failure.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    let violations = validate_asset_create(&body);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    let draft: CreateAsset = serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Malformed asset body: {}", e)))?;

    let asset = Asset::create(
        draft.title,
        draft.description,
        draft.images,
        draft.kind,
        draft.tags,
        draft.category,
    );
    state.assets.insert(&asset).await?;

    tracing::info!(id = %asset.id, by = %user.username, "created asset");

    Ok((StatusCode::CREATED, Json(asset)))
}

/// PATCH /api/v1/assets/:id - Validate the partial body, flatten it into a
/// dot-path update document, apply it, and return the updated record.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Asset>, ApiError> {
    let violations = validate_asset_patch(&body);
    if !violations.is_empty() {
        return Err(ApiError::validation(violations));
    }

    // Validation guarantees the body is an object.
    let update = body
        .as_object()
        .map(flatten)
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))?;
    state.assets.update_by_id(&id, &update).await?;

    let asset = state
        .assets
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No asset with id '{}'", id)))?;
    Ok(Json(asset))
}

/// DELETE /api/v1/assets/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.assets.delete_by_id(&id).await?;
    Ok(Json(json!({ "deleted": true })))
}
