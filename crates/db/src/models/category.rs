//! Category model, read view and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

use super::attribute::Attribute;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category with its attribute definitions and the number of items
/// referencing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub attributes: Vec<Attribute>,
    pub item_count: i64,
}

/// One attribute definition linked to a category, as returned by the
/// batch population query.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryAttributeRow {
    pub category_id: DbId,
    #[sqlx(flatten)]
    pub attribute: Attribute,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    /// Attribute definition ids, in display order.
    #[serde(default)]
    pub attributes: Vec<DbId>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// Partial update. `attributes`, when present, replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub attributes: Option<Vec<DbId>>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
}

/// Query parameters for the paginated `GET /categories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListParams {
    pub page: Option<String>,
    pub items_per_page: Option<String>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

/// Query parameters for the unpaginated `GET /categories/all`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySearchParams {
    pub search: Option<String>,
}
