//! Route definitions for the `/attributes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::attribute;
use crate::state::AppState;

/// Routes mounted at `/attributes`.
///
/// ```text
/// GET    /        -> list (?search=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(attribute::list).post(attribute::create))
        .route(
            "/{id}",
            get(attribute::get_by_id).patch(attribute::update).delete(attribute::delete),
        )
}
