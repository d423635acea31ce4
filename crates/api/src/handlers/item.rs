//! Handlers for the `/items` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::item_query::{resolve_item_query, ItemQuery, Resolution};
use stockroom_core::pagination::Paginated;
use stockroom_core::types::DbId;
use stockroom_db::models::item::{
    AttributeValueInput, CreateItem, ItemDetail, UpdateItem, UpdateItemAttribute,
};
use stockroom_db::repositories::{
    AttributeRepo, CategoryRepo, ColorRepo, ItemRepo, PgReferenceLookup,
};
use stockroom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::Empty;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}

/// Check that every referenced category, color and attribute exists.
async fn ensure_references_exist(
    pool: &DbPool,
    category: Option<DbId>,
    color: Option<DbId>,
    attributes: &[AttributeValueInput],
) -> AppResult<()> {
    if let Some(id) = category {
        if CategoryRepo::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Category",
                id,
            }));
        }
    }

    if let Some(id) = color {
        if ColorRepo::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound { entity: "Color", id }));
        }
    }

    let attribute_ids: Vec<DbId> = attributes.iter().map(|a| a.attribute).collect();
    if let Some(id) = AttributeRepo::first_missing(pool, &attribute_ids).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Attribute",
            id,
        }));
    }

    Ok(())
}

async fn load_detail(pool: &DbPool, id: DbId) -> AppResult<ItemDetail> {
    ItemRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/items
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<ItemDetail>)> {
    if input.category.is_none() {
        return Err(AppError::BadRequest("Category is required".into()));
    }
    ensure_references_exist(&state.pool, input.category, input.color, &input.attributes).await?;

    let item = ItemRepo::create(&state.pool, &input).await?;
    tracing::info!(item_id = %item.id, "Item created");

    let detail = load_detail(&state.pool, item.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/items?id=&category=&color=&status=&name=&page=&itemsPerPage=&attributes[key]=value
///
/// Filter values that cannot be resolved produce an empty page, never an
/// error.
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Paginated<ItemDetail>>> {
    let query = ItemQuery::from_pairs(pairs);
    let page = query.page_request();

    let lookup = PgReferenceLookup::new(&state.pool);
    let filter = match resolve_item_query(&lookup, &query).await? {
        Resolution::Resolved(filter) => filter,
        Resolution::Missing => {
            tracing::debug!(?query, "Item filter did not resolve; returning empty page");
            return Ok(Json(Paginated::empty(page)));
        }
    };

    let (items, total) = ItemRepo::search(&state.pool, &filter, page).await?;
    Ok(Json(Paginated::new(items, total, page)))
}

/// GET /api/v1/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ItemDetail>> {
    Ok(Json(load_detail(&state.pool, id).await?))
}

/// PATCH /api/v1/items/{id}
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<Json<ItemDetail>> {
    ensure_references_exist(
        &state.pool,
        input.category,
        input.color.flatten(),
        input.attributes.as_deref().unwrap_or_default(),
    )
    .await?;

    ItemRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(load_detail(&state.pool, id).await?))
}

/// PATCH /api/v1/items/{id}/attributes/{attribute_id}
pub async fn update_attribute(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((id, attribute_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateItemAttribute>,
) -> AppResult<Json<ItemDetail>> {
    if ItemRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let updated =
        ItemRepo::set_attribute_value(&state.pool, id, attribute_id, input.value.as_deref())
            .await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Attribute",
            id: attribute_id,
        }));
    }

    Ok(Json(load_detail(&state.pool, id).await?))
}

/// DELETE /api/v1/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Empty>> {
    if !ItemRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(item_id = %id, "Item deleted");
    Ok(Json(Empty::default()))
}
