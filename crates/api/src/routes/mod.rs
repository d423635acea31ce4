pub mod attribute;
pub mod auth;
pub mod category;
pub mod color;
pub mod health;
pub mod item;
pub mod upload;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /categories                                      list (paged), create
/// /categories/all                                  list all (unpaged)
/// /categories/{id}                                 get, update, delete
///
/// /attributes                                      list, create
/// /attributes/{id}                                 get, update, delete
///
/// /colors                                          list, create
/// /colors/{id}                                     get, update, delete
///
/// /items                                           search (paged), create
/// /items/{id}                                      get, update, delete
/// /items/{id}/attributes/{attribute_id}            update one value
///
/// /users                                           list, create (admin only)
/// /users/{id}                                      get, update, delete (admin only)
/// /users/{id}/password                             change password (admin or self)
///
/// /upload/{kind}/{id}                              replace image (multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", category::router())
        .nest("/attributes", attribute::router())
        .nest("/colors", color::router())
        .nest("/items", item::router())
        .nest("/users", user::router())
        // Image uploads for users, categories and items.
        .nest("/upload", upload::router())
}
