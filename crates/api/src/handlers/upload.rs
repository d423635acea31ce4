//! Handler for `POST /upload/{kind}/{id}`: replace an entity's image.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use stockroom_core::entity_kind::EntityKind;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::category::CategoryDetail;
use stockroom_db::models::item::ItemDetail;
use stockroom_db::models::user::UserResponse;
use stockroom_db::repositories::{CategoryRepo, ItemRepo, UserRepo};
use stockroom_db::DbPool;
use stockroom_storage::paths::object_path;
use stockroom_storage::UploadObject;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Content type used when the multipart part does not declare one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The entity after its image URL was replaced.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadedEntity {
    User(UserResponse),
    Category(CategoryDetail),
    Item(ItemDetail),
}

/// The `file` part of the multipart body.
struct FilePart {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_file_part(multipart: &mut Multipart) -> AppResult<Option<FilePart>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(base_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(Some(FilePart {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Last path segment of a client-supplied filename.
fn base_name(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Current image URL of the entity, or NotFound.
async fn current_image_url(pool: &DbPool, kind: EntityKind, id: DbId) -> AppResult<Option<String>> {
    let image_url = match kind {
        EntityKind::User => UserRepo::find_by_id(pool, id).await?.map(|u| u.image_url),
        EntityKind::Category => CategoryRepo::find_by_id(pool, id)
            .await?
            .map(|c| c.image_url),
        EntityKind::Item => ItemRepo::find_by_id(pool, id).await?.map(|i| i.image_url),
    };
    image_url.ok_or_else(|| not_found(kind, id))
}

async fn store_image_url(
    pool: &DbPool,
    kind: EntityKind,
    id: DbId,
    url: &str,
) -> AppResult<UploadedEntity> {
    let entity = match kind {
        EntityKind::User => UserRepo::set_image_url(pool, id, url)
            .await?
            .map(|u| UploadedEntity::User(u.into())),
        EntityKind::Category => {
            if CategoryRepo::set_image_url(pool, id, url).await?.is_none() {
                return Err(not_found(kind, id));
            }
            CategoryRepo::find_detail(pool, id)
                .await?
                .map(UploadedEntity::Category)
        }
        EntityKind::Item => {
            if ItemRepo::set_image_url(pool, id, url).await?.is_none() {
                return Err(not_found(kind, id));
            }
            ItemRepo::find_detail(pool, id).await?.map(UploadedEntity::Item)
        }
    };
    entity.ok_or_else(|| not_found(kind, id))
}

fn not_found(kind: EntityKind, id: DbId) -> AppError {
    let entity = match kind {
        EntityKind::User => "User",
        EntityKind::Category => "Category",
        EntityKind::Item => "Item",
    };
    AppError::Core(CoreError::NotFound { entity, id })
}

/// POST /api/v1/upload/{kind}/{id}
///
/// Accepts a multipart form with a required `file` field. The previous
/// image is removed best-effort, the new one uploaded under
/// `{kind}/{id}-{unix_millis}-{filename}` and its public URL stored on the
/// entity. Returns the updated entity.
pub async fn upload_image(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((kind, id)): Path<(String, DbId)>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadedEntity>> {
    let kind: EntityKind = kind.parse()?;

    let file = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("No file provided".into()))?;

    let previous = current_image_url(&state.pool, kind, id).await?;

    if let Some(old_path) = previous.as_deref().and_then(|u| state.storage.path_from_url(u)) {
        if let Err(e) = state.storage.remove(&[old_path.clone()]).await {
            tracing::warn!(error = %e, path = %old_path, "Failed to remove previous image");
        }
    }

    let path = object_path(
        kind,
        id,
        chrono::Utc::now().timestamp_millis(),
        &file.filename,
    );
    state
        .storage
        .upload(UploadObject {
            path: &path,
            bytes: &file.bytes,
            content_type: &file.content_type,
        })
        .await?;

    let public_url = state.storage.public_url(&path);
    let entity = store_image_url(&state.pool, kind, id, &public_url).await?;
    tracing::info!(kind = %kind, id = %id, path = %path, "Image uploaded");

    Ok(Json(entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("../../etc/passwd"), "passwd");
        assert_eq!(base_name("C:\\photos\\drill.png"), "drill.png");
        assert_eq!(base_name("drill.png"), "drill.png");
    }
}
