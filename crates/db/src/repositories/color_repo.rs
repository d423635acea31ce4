//! Repository for the `colors` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use super::contains_pattern;
use crate::models::color::{Color, ColorListParams, CreateColor, UpdateColor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, color, created_at, updated_at";

/// Provides CRUD operations for colors.
pub struct ColorRepo;

impl ColorRepo {
    /// Insert a new color, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateColor) -> Result<Color, sqlx::Error> {
        let query = format!("INSERT INTO colors (name, color) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Color>(&query)
            .bind(input.name.trim())
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Color>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM colors WHERE id = $1");
        sqlx::query_as::<_, Color>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several colors at once, in no particular order.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Color>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM colors WHERE id = ANY($1)");
        sqlx::query_as::<_, Color>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List colors sorted by name, optionally filtered by a substring.
    pub async fn list(pool: &PgPool, params: &ColorListParams) -> Result<Vec<Color>, sqlx::Error> {
        match params.search.as_deref().filter(|s| !s.is_empty()) {
            Some(search) => {
                let query =
                    format!("SELECT {COLUMNS} FROM colors WHERE name ILIKE $1 ORDER BY name, id");
                sqlx::query_as::<_, Color>(&query)
                    .bind(contains_pattern(search))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM colors ORDER BY name, id");
                sqlx::query_as::<_, Color>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update a color. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateColor,
    ) -> Result<Option<Color>, sqlx::Error> {
        let query = format!(
            "UPDATE colors SET \
                 name = COALESCE($2, name), \
                 color = COALESCE($3, color) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Color>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.color.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete the color row only. Items still referencing it are cleared
    /// separately by [`super::ItemRepo::clear_color`].
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM colors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
