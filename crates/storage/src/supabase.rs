//! Supabase Storage client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::paths::{encode_path, path_from_public_url, public_url};
use crate::{BlobStore, UploadObject};

/// `Cache-Control` sent with every upload.
const CACHE_CONTROL: &str = "max-age=3600";

/// Page size for bucket listings.
const LIST_LIMIT: u32 = 100;

/// [`BlobStore`] backed by one Supabase Storage bucket.
#[derive(Clone)]
pub struct SupabaseStorage {
    config: StorageConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
}

#[derive(Debug, Deserialize)]
struct ListedObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl SupabaseStorage {
    pub fn new(config: StorageConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url,
            self.config.bucket,
            encode_path(path)
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.config.service_key))
            .header("apikey", &self.config.service_key)
    }
}

/// Turn a non-success response into [`StorageError::Rejected`], preferring
/// the store's own error message over the raw body.
async fn check(resp: Response) -> Result<Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.clone()
            }
        });

    warn!(status = %status, body = %body, "Supabase Storage request rejected");
    Err(StorageError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl BlobStore for SupabaseStorage {
    async fn upload(&self, object: UploadObject<'_>) -> Result<(), StorageError> {
        let url = self.object_url(object.path);
        debug!(
            url = %url,
            size = object.bytes.len(),
            content_type = %object.content_type,
            "Uploading to Supabase Storage"
        );

        let resp = self
            .authorized(self.client.post(&url))
            .header("Content-Type", object.content_type)
            .header("Cache-Control", CACHE_CONTROL)
            .header("x-upsert", "true")
            .body(object.bytes.to_vec())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_url(&self.config.base_url, &self.config.bucket, path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        path_from_public_url(url, &self.config.bucket)
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = format!(
            "{}/storage/v1/object/{}",
            self.config.base_url, self.config.bucket
        );

        let resp = self
            .authorized(self.client.delete(&url))
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await?;
        check(resp).await?;
        debug!(count = paths.len(), "Removed objects from Supabase Storage");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let url = format!(
            "{}/storage/v1/object/list/{}",
            self.config.base_url, self.config.bucket
        );

        let resp = self
            .authorized(self.client.post(&url))
            .json(&ListRequest {
                prefix,
                limit: LIST_LIMIT,
                offset: 0,
            })
            .send()
            .await?;
        let objects: Vec<ListedObject> = check(resp).await?.json().await?;
        Ok(objects.into_iter().map(|o| o.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> SupabaseStorage {
        SupabaseStorage::new(
            StorageConfig {
                base_url: "https://demo.supabase.co".into(),
                service_key: "key".into(),
                bucket: "app-images".into(),
            },
            Client::new(),
        )
    }

    #[test]
    fn object_url_targets_bucket() {
        assert_eq!(
            storage().object_url("item/a.png"),
            "https://demo.supabase.co/storage/v1/object/app-images/item/a.png"
        );
    }

    #[test]
    fn object_url_encodes_filename() {
        assert_eq!(
            storage().object_url("item/a#b?.png"),
            "https://demo.supabase.co/storage/v1/object/app-images/item/a%23b%3F.png"
        );
    }

    #[test]
    fn public_url_and_path_are_inverse() {
        let store = storage();
        let url = store.public_url("user/x-1-me.jpg");
        assert_eq!(store.path_from_url(&url).as_deref(), Some("user/x-1-me.jpg"));
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"statusCode":"400","error":"Bad","message":"Invalid key"}"#)
                .unwrap();
        assert_eq!(body.message.or(body.error).as_deref(), Some("Invalid key"));
    }
}
