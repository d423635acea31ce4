//! Attribute definition model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `attributes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttribute {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttribute {
    pub name: Option<String>,
}

/// Query parameters for `GET /attributes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeListParams {
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}
