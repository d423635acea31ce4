use std::sync::Arc;

use stockroom_storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockroom_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Object store for entity images.
    pub storage: Arc<dyn BlobStore>,
}
