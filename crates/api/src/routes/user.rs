//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /               -> list (admin only)
/// POST   /               -> create (admin only)
/// GET    /{id}           -> get_by_id (admin only)
/// PATCH  /{id}           -> update (admin only)
/// DELETE /{id}           -> delete (admin only)
/// PUT    /{id}/password  -> change_password (admin or self)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list).post(user::create))
        .route(
            "/{id}",
            get(user::get_by_id).patch(user::update).delete(user::delete),
        )
        .route("/{id}/password", put(user::change_password))
}
