//! Route definitions for the `/colors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::color;
use crate::state::AppState;

/// Routes mounted at `/colors`.
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
        .route("/", get(color::list).post(color::create))
        .route(
            "/{id}",
            get(color::get_by_id).patch(color::update).delete(color::delete),
        )
}
