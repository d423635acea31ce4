//! Color model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `colors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub id: DbId,
    pub name: String,
    /// Hex code, e.g. `"#FF0000"`.
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateColor {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateColor {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Query parameters for `GET /colors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorListParams {
    pub search: Option<String>,
}
