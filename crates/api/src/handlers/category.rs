//! Handlers for the `/categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::color::validate_name;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::{PageRequest, Paginated};
use stockroom_core::types::DbId;
use stockroom_db::models::category::{
    Category, CategoryDetail, CategoryListParams, CategorySearchParams, CreateCategory,
    UpdateCategory,
};
use stockroom_db::repositories::{AttributeRepo, CategoryRepo, ItemRepo};
use stockroom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Empty;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

/// Reject the first attribute id that has no definition.
async fn ensure_attributes_exist(pool: &DbPool, ids: &[DbId]) -> AppResult<()> {
    match AttributeRepo::first_missing(pool, ids).await? {
        Some(id) => Err(AppError::Core(CoreError::NotFound {
            entity: "Attribute",
            id,
        })),
        None => Ok(()),
    }
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<CategoryDetail>)> {
    validate_name(&input.name, "name")?;
    ensure_attributes_exist(&state.pool, &input.attributes).await?;

    let category = CategoryRepo::create(&state.pool, &input).await?;
    let detail = CategoryRepo::find_detail(&state.pool, category.id)
        .await?
        .ok_or_else(|| not_found(category.id))?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/categories/all?search=
///
/// Every category sorted by name, without attributes or counts.
pub async fn list_all(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CategorySearchParams>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = CategoryRepo::list_all(&state.pool, params.search.as_deref()).await?;
    Ok(Json(categories))
}

/// GET /api/v1/categories?page=&itemsPerPage=&name=
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<Paginated<CategoryDetail>>> {
    let page =
        PageRequest::from_params(params.page.as_deref(), params.items_per_page.as_deref());
    let (categories, total) =
        CategoryRepo::list_page(&state.pool, params.name.as_deref(), page).await?;
    Ok(Json(Paginated::new_or_empty(categories, total, page)))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CategoryDetail>> {
    let detail = CategoryRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

/// PATCH /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<CategoryDetail>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(attributes) = &input.attributes {
        ensure_attributes_exist(&state.pool, attributes).await?;
    }

    CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let detail = CategoryRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

/// DELETE /api/v1/categories/{id}
///
/// Deletes the category, then clears it from every item that referenced
/// it. The two steps are not atomic.
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Empty>> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let cleared = ItemRepo::clear_category(&state.pool, id).await?;
    tracing::info!(category_id = %id, cleared, "Category deleted");
    Ok(Json(Empty::default()))
}
