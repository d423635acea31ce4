//! Repository for the `attributes` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use super::contains_pattern;
use crate::models::attribute::{Attribute, AttributeListParams, CreateAttribute, UpdateAttribute};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for attribute definitions.
pub struct AttributeRepo;

impl AttributeRepo {
    /// Insert a new attribute, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAttribute) -> Result<Attribute, sqlx::Error> {
        let query = format!("INSERT INTO attributes (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Attribute>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attributes WHERE id = $1");
        sqlx::query_as::<_, Attribute>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an attribute by name, ignoring case. The oldest row wins when
    /// several share a name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attributes \
             WHERE LOWER(name) = LOWER($1) \
             ORDER BY created_at, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List attributes sorted by name, optionally filtered by a substring.
    pub async fn list(
        pool: &PgPool,
        params: &AttributeListParams,
    ) -> Result<Vec<Attribute>, sqlx::Error> {
        match params.search.as_deref().filter(|s| !s.is_empty()) {
            Some(search) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM attributes WHERE name ILIKE $1 ORDER BY name, id"
                );
                sqlx::query_as::<_, Attribute>(&query)
                    .bind(contains_pattern(search))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM attributes ORDER BY name, id");
                sqlx::query_as::<_, Attribute>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update an attribute. Returns `None` if no row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAttribute,
    ) -> Result<Option<Attribute>, sqlx::Error> {
        let query = format!(
            "UPDATE attributes SET name = COALESCE($2, name) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attribute>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .fetch_optional(pool)
            .await
    }

    /// Delete an attribute. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attributes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the first id in `ids` that has no attribute row, if any.
    pub async fn first_missing(pool: &PgPool, ids: &[DbId]) -> Result<Option<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(None);
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT requested.id \
             FROM UNNEST($1::uuid[]) WITH ORDINALITY AS requested(id, ord) \
             WHERE NOT EXISTS (SELECT 1 FROM attributes a WHERE a.id = requested.id) \
             ORDER BY requested.ord \
             LIMIT 1",
        )
        .bind(ids)
        .fetch_optional(pool)
        .await
    }
}
