//! Handlers for the `/attributes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::color::validate_name;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::attribute::{
    Attribute, AttributeListParams, CreateAttribute, UpdateAttribute,
};
use stockroom_db::repositories::AttributeRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Empty;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Attribute",
        id,
    })
}

/// POST /api/v1/attributes
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateAttribute>,
) -> AppResult<(StatusCode, Json<Attribute>)> {
    validate_name(&input.name, "name")?;
    let attribute = AttributeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

/// GET /api/v1/attributes?search=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<AttributeListParams>,
) -> AppResult<Json<Vec<Attribute>>> {
    let attributes = AttributeRepo::list(&state.pool, &params).await?;
    Ok(Json(attributes))
}

/// GET /api/v1/attributes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Attribute>> {
    let attribute = AttributeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(attribute))
}

/// PATCH /api/v1/attributes/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAttribute>,
) -> AppResult<Json<Attribute>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    let attribute = AttributeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(attribute))
}

/// DELETE /api/v1/attributes/{id}
///
/// Values already stored on items keep the dangling attribute id.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Empty>> {
    if !AttributeRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(attribute_id = %id, "Attribute deleted");
    Ok(Json(Empty::default()))
}
