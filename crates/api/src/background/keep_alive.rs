//! Jobs that keep idle-suspending hosted services awake.

use stockroom_storage::{BlobStore, StorageError};

/// List the bucket root so the storage project registers activity.
///
/// Returns the number of entries listed.
pub async fn ping_storage(storage: &dyn BlobStore) -> Result<usize, StorageError> {
    let names = storage.list("").await?;
    Ok(names.len())
}

/// GET the backend's own public URL and return the response body.
pub async fn ping_backend(http: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    http.get(url).send().await?.error_for_status()?.text().await
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use stockroom_storage::UploadObject;

    use super::*;

    struct ListingStore {
        fail: bool,
    }

    #[async_trait]
    impl BlobStore for ListingStore {
        async fn upload(&self, _object: UploadObject<'_>) -> Result<(), StorageError> {
            Ok(())
        }

        fn public_url(&self, path: &str) -> String {
            path.to_string()
        }

        fn path_from_url(&self, _url: &str) -> Option<String> {
            None
        }

        async fn remove(&self, _paths: &[String]) -> Result<(), StorageError> {
            Ok(())
        }

        async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
            assert_eq!(prefix, "");
            if self.fail {
                return Err(StorageError::Rejected {
                    status: 401,
                    message: "invalid key".into(),
                });
            }
            Ok(vec!["item".into(), "user".into()])
        }
    }

    #[tokio::test]
    async fn storage_ping_counts_root_entries() {
        let count = ping_storage(&ListingStore { fail: false }).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn storage_ping_surfaces_store_errors() {
        let result = ping_storage(&ListingStore { fail: true }).await;
        assert_matches!(result, Err(StorageError::Rejected { status: 401, .. }));
    }
}
