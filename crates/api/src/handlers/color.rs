//! Handlers for the `/colors` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::color::{validate_hex_color, validate_name};
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::color::{Color, ColorListParams, CreateColor, UpdateColor};
use stockroom_db::repositories::{ColorRepo, ItemRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Empty;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Color", id })
}

/// POST /api/v1/colors
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateColor>,
) -> AppResult<(StatusCode, Json<Color>)> {
    validate_name(&input.name, "name")?;
    validate_hex_color(&input.color)?;
    let color = ColorRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(color)))
}

/// GET /api/v1/colors?search=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<ColorListParams>,
) -> AppResult<Json<Vec<Color>>> {
    let colors = ColorRepo::list(&state.pool, &params).await?;
    Ok(Json(colors))
}

/// GET /api/v1/colors/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Color>> {
    let color = ColorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(color))
}

/// PATCH /api/v1/colors/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateColor>,
) -> AppResult<Json<Color>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(color) = &input.color {
        validate_hex_color(color)?;
    }
    let color = ColorRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(color))
}

/// DELETE /api/v1/colors/{id}
///
/// Deletes the color, then clears it from every item that referenced it.
/// The two steps are not atomic.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Empty>> {
    if !ColorRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let cleared = ItemRepo::clear_color(&state.pool, id).await?;
    tracing::info!(color_id = %id, cleared, "Color deleted");
    Ok(Json(Empty::default()))
}
