//! Route definitions for the `/categories` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /        -> list (paged, ?name=&page=&itemsPerPage=)
/// POST   /        -> create
/// GET    /all     -> list_all (?search=)
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category::list).post(category::create))
        .route("/all", get(category::list_all))
        .route(
            "/{id}",
            get(category::get_by_id)
                .patch(category::update)
                .delete(category::delete),
        )
}
