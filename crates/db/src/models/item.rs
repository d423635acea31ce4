//! Item model, populated read view and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use stockroom_core::item_status::ItemStatus;
use stockroom_core::types::{DbId, Timestamp};

use super::category::Category;
use super::color::Color;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `items` table. References are raw ids.
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub status: String,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub image_url: Option<String>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One attribute-value pair of an item, with the attribute's current name
/// when the definition still exists.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttributeValue {
    #[serde(skip)]
    pub item_id: DbId,
    #[serde(rename = "attribute")]
    pub attribute_id: DbId,
    pub attribute_name: Option<String>,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Read view
// ---------------------------------------------------------------------------

/// An item with its category and color dereferenced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: DbId,
    pub category: Option<Category>,
    pub color: Option<Color>,
    pub status: ItemStatus,
    pub name: Option<String>,
    pub comment: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub attributes: Vec<ItemAttributeValue>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// One `(attribute, value)` pair in a create or update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeValueInput {
    pub attribute: DbId,
    pub value: Option<String>,
}

/// DTO for creating an item. `category` is required; it is optional here
/// so a missing value can be reported as a 400 rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub category: Option<DbId>,
    pub color: Option<DbId>,
    pub status: Option<ItemStatus>,
    pub name: Option<String>,
    pub comment: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    #[serde(default)]
    pub attributes: Vec<AttributeValueInput>,
}

/// Partial update. `attributes`, when present, replaces the whole list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub category: Option<DbId>,
    /// `Some(Some(id))` sets the color, `Some(None)` (JSON `null`) clears it,
    /// `None` (field absent) leaves it unchanged.
    #[serde(default, deserialize_with = "present")]
    pub color: Option<Option<DbId>>,
    pub status: Option<ItemStatus>,
    pub name: Option<String>,
    pub comment: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub attributes: Option<Vec<AttributeValueInput>>,
}

/// Marks a field as present, so an explicit `null` becomes `Some(None)`
/// rather than collapsing into an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Body for `PATCH /items/{id}/attributes/{attribute_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateItemAttribute {
    pub value: Option<String>,
}
