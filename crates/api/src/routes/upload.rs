use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Largest accepted multipart body.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Routes mounted at `/upload`.
///
/// ```text
/// POST /{kind}/{id}   -> upload_image (multipart, field "file")
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}/{id}", post(upload::upload_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
