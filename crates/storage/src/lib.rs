//! Blob storage for entity images.
//!
//! - [`BlobStore`] -- the operations the API needs from an object store.
//! - [`SupabaseStorage`] -- implementation over the Supabase Storage REST API.
//! - [`paths`] -- object key construction and public URL parsing.

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod paths;
pub mod supabase;

pub use config::StorageConfig;
pub use error::StorageError;
pub use supabase::SupabaseStorage;

/// An object to write into the store.
#[derive(Debug, Clone)]
pub struct UploadObject<'a> {
    pub path: &'a str,
    pub bytes: &'a [u8],
    pub content_type: &'a str,
}

/// Object store operations used by the upload gateway and the keep-alive job.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing object at the same path.
    async fn upload(&self, object: UploadObject<'_>) -> Result<(), StorageError>;

    /// Publicly readable URL of the object at `path`.
    fn public_url(&self, path: &str) -> String;

    /// Object path for a public URL produced by [`BlobStore::public_url`],
    /// or `None` if the URL does not point into this store's bucket.
    fn path_from_url(&self, url: &str) -> Option<String>;

    /// Remove objects. Missing paths are not an error.
    async fn remove(&self, paths: &[String]) -> Result<(), StorageError>;

    /// List object names under `prefix` (empty for the bucket root).
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}
