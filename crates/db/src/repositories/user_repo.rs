//! Repository for the `users` table.

use sqlx::PgPool;
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::DbId;

use super::contains_pattern;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, image_url, \
                        created_at, updated_at";

/// Filter shared by the page and count queries. `$1` is the role, `$2` the
/// search pattern.
const LIST_FILTER: &str = "($1::text IS NULL OR role = $1) \
     AND ($2::text IS NULL OR first_name ILIKE $2 OR last_name ILIKE $2 OR email ILIKE $2)";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, role, first_name, last_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// One page of users, most recently created first, plus the total
    /// match count.
    pub async fn list_page(
        pool: &PgPool,
        role: Option<&str>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, i64), sqlx::Error> {
        let role = role.filter(|r| !r.is_empty());
        let pattern = search.filter(|s| !s.is_empty()).map(contains_pattern);

        let select = format!(
            "SELECT {COLUMNS} FROM users WHERE {LIST_FILTER} \
             ORDER BY created_at DESC, id \
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, User>(&select)
            .bind(role)
            .bind(pattern.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool);

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM users WHERE {LIST_FILTER}");
        let count = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(role)
            .bind(pattern.as_deref())
            .fetch_one(pool);

        tokio::try_join!(rows, count)
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                role = COALESCE($3, role),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                image_url = COALESCE($6, image_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Set the stored image URL.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
