//! Repository for the `categories` and `category_attributes` tables.
//!
//! Read views ([`CategoryDetail`]) are populated in batches: one query for
//! the linked attribute definitions and one for the item counts, regardless
//! of how many categories are on the page.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::DbId;

use super::contains_pattern;
use crate::models::attribute::Attribute;
use crate::models::category::{
    Category, CategoryAttributeRow, CategoryDetail, CreateCategory, UpdateCategory,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, image_url, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a category and its attribute links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO categories (name, image_url) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(input.image_url.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        replace_attributes(&mut tx, category.id, &input.attributes).await?;

        tx.commit().await?;
        Ok(category)
    }

    /// Update a category. Only non-`None` fields in `input` are applied;
    /// `attributes` replaces the whole link list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE categories SET \
                 name = COALESCE($2, name), \
                 image_url = COALESCE($3, image_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.image_url.as_deref())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(category) = updated else {
            return Ok(None);
        };

        if let Some(attributes) = &input.attributes {
            replace_attributes(&mut tx, id, attributes).await?;
        }

        tx.commit().await?;
        Ok(Some(category))
    }

    /// Set the stored image URL.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("UPDATE categories SET image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete the category row only. Items still referencing it are
    /// cleared separately by [`super::ItemRepo::clear_category`].
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by name, ignoring case. The oldest row wins when
    /// several share a name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE LOWER(name) = LOWER($1) \
             ORDER BY created_at, id \
             LIMIT 1"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several categories at once, in no particular order.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Category>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = ANY($1)");
        sqlx::query_as::<_, Category>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// A single category with attributes and item count.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CategoryDetail>, sqlx::Error> {
        let Some(category) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut details = Self::populate(pool, vec![category]).await?;
        Ok(details.pop())
    }

    /// Every category sorted by name, optionally filtered by a substring.
    pub async fn list_all(
        pool: &PgPool,
        search: Option<&str>,
    ) -> Result<Vec<Category>, sqlx::Error> {
        match search.filter(|s| !s.is_empty()) {
            Some(search) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM categories WHERE name ILIKE $1 ORDER BY name, id"
                );
                sqlx::query_as::<_, Category>(&query)
                    .bind(contains_pattern(search))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name, id");
                sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
            }
        }
    }

    /// One page of categories sorted by name, plus the total match count.
    pub async fn list_page(
        pool: &PgPool,
        name: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<CategoryDetail>, i64), sqlx::Error> {
        let pattern = name.filter(|s| !s.is_empty()).map(contains_pattern);

        let select = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY name, id \
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, Category>(&select)
            .bind(pattern.as_deref())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool);

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM categories \
             WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(pattern.as_deref())
        .fetch_one(pool);

        let (categories, total) = tokio::try_join!(rows, count)?;
        let details = Self::populate(pool, categories).await?;
        Ok((details, total))
    }

    /// Attach attribute definitions and item counts, preserving order.
    pub async fn populate(
        pool: &PgPool,
        categories: Vec<Category>,
    ) -> Result<Vec<CategoryDetail>, sqlx::Error> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = categories.iter().map(|c| c.id).collect();

        let links = sqlx::query_as::<_, CategoryAttributeRow>(
            "SELECT ca.category_id, a.id, a.name, a.created_at, a.updated_at \
             FROM category_attributes ca \
             JOIN attributes a ON a.id = ca.attribute_id \
             WHERE ca.category_id = ANY($1) \
             ORDER BY ca.category_id, ca.position",
        )
        .bind(&ids)
        .fetch_all(pool);

        let counts = sqlx::query_as::<_, (DbId, i64)>(
            "SELECT category_id, COUNT(*)::BIGINT \
             FROM items \
             WHERE category_id = ANY($1) \
             GROUP BY category_id",
        )
        .bind(&ids)
        .fetch_all(pool);

        let (links, counts) = tokio::try_join!(links, counts)?;

        let mut attributes: HashMap<DbId, Vec<Attribute>> = HashMap::new();
        for link in links {
            attributes
                .entry(link.category_id)
                .or_default()
                .push(link.attribute);
        }
        let counts: HashMap<DbId, i64> = counts.into_iter().collect();

        Ok(categories
            .into_iter()
            .map(|category| CategoryDetail {
                attributes: attributes.remove(&category.id).unwrap_or_default(),
                item_count: counts.get(&category.id).copied().unwrap_or(0),
                category,
            })
            .collect())
    }
}

/// Replace the attribute links of a category, keeping the given order.
async fn replace_attributes(
    conn: &mut PgConnection,
    category_id: DbId,
    attribute_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM category_attributes WHERE category_id = $1")
        .bind(category_id)
        .execute(&mut *conn)
        .await?;

    if attribute_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO category_attributes (category_id, attribute_id, position) \
         SELECT $1, link.attribute_id, MIN(link.ord)::INTEGER \
         FROM UNNEST($2::uuid[]) WITH ORDINALITY AS link(attribute_id, ord) \
         GROUP BY link.attribute_id",
    )
    .bind(category_id)
    .bind(attribute_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
