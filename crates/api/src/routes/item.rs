//! Route definitions for the `/items` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /                                -> list (filters, paging)
/// POST   /                                -> create
/// GET    /{id}                            -> get_by_id
/// PATCH  /{id}                            -> update
/// DELETE /{id}                            -> delete
/// PATCH  /{id}/attributes/{attribute_id}  -> update_attribute
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item::list).post(item::create))
        .route(
            "/{id}",
            get(item::get_by_id).patch(item::update).delete(item::delete),
        )
        .route(
            "/{id}/attributes/{attribute_id}",
            patch(item::update_attribute),
        )
}
