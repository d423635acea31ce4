//! Repository for the `items` and `item_attributes` tables.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use stockroom_core::item_query::ItemFilter;
use stockroom_core::item_status::ItemStatus;
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::DbId;

use super::{contains_pattern, escape_like, CategoryRepo, ColorRepo};
use crate::models::category::Category;
use crate::models::color::Color;
use crate::models::item::{
    AttributeValueInput, CreateItem, Item, ItemAttributeValue, ItemDetail, UpdateItem,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, color_id, status, name, comment, image_url, \
    width, length, height, created_at, updated_at";

/// Provides CRUD and filtered listing for items.
pub struct ItemRepo;

impl ItemRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert an item and its attribute values in one transaction.
    ///
    /// References are stored as given; callers check that they exist.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let status = input.status.unwrap_or_default();
        let query = format!(
            "INSERT INTO items \
                 (category_id, color_id, status, name, comment, image_url, width, length, height) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(input.category)
            .bind(input.color)
            .bind(status.as_str())
            .bind(input.name.as_deref())
            .bind(input.comment.as_deref())
            .bind(input.image_url.as_deref())
            .bind(input.width)
            .bind(input.length)
            .bind(input.height)
            .fetch_one(&mut *tx)
            .await?;

        replace_attributes(&mut tx, item.id, &input.attributes).await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Update an item. Only non-`None` fields in `input` are applied;
    /// `attributes` replaces the whole value list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // `color` may be cleared with an explicit null; the other columns
        // only change when provided.
        let color_provided = input.color.is_some();
        let color_value = input.color.flatten();

        let query = format!(
            "UPDATE items SET \
                 category_id = COALESCE($2, category_id), \
                 color_id = CASE WHEN $3 THEN $4 ELSE color_id END, \
                 status = COALESCE($5, status), \
                 name = COALESCE($6, name), \
                 comment = COALESCE($7, comment), \
                 image_url = COALESCE($8, image_url), \
                 width = COALESCE($9, width), \
                 length = COALESCE($10, length), \
                 height = COALESCE($11, height) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(input.category)
            .bind(color_provided)
            .bind(color_value)
            .bind(input.status.map(ItemStatus::as_str))
            .bind(input.name.as_deref())
            .bind(input.comment.as_deref())
            .bind(input.image_url.as_deref())
            .bind(input.width)
            .bind(input.length)
            .bind(input.height)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(item) = updated else {
            return Ok(None);
        };

        if let Some(attributes) = &input.attributes {
            replace_attributes(&mut tx, id, attributes).await?;
        }

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Set the value of one attribute on an item. When the attribute occurs
    /// more than once, the first occurrence is updated.
    ///
    /// Returns `false` if the item does not carry the attribute.
    pub async fn set_attribute_value(
        pool: &PgPool,
        item_id: DbId,
        attribute_id: DbId,
        value: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE item_attributes SET value = $3 \
             WHERE item_id = $1 AND position = ( \
                 SELECT MIN(position) FROM item_attributes \
                 WHERE item_id = $1 AND attribute_id = $2 \
             )",
        )
        .bind(item_id)
        .bind(attribute_id)
        .bind(value)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE items SET updated_at = NOW() WHERE id = $1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Set the stored image URL.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("UPDATE items SET image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Attribute values go with it.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Null out the category of every item referencing `category_id`.
    /// Returns the number of items touched.
    pub async fn clear_category(pool: &PgPool, category_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE items SET category_id = NULL WHERE category_id = $1")
            .bind(category_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Null out the color of every item referencing `color_id`.
    /// Returns the number of items touched.
    pub async fn clear_color(pool: &PgPool, color_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE items SET color_id = NULL WHERE color_id = $1")
            .bind(color_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A single item with category, color and attribute values populated.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ItemDetail>, sqlx::Error> {
        let Some(item) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut details = Self::populate(pool, vec![item]).await?;
        Ok(details.pop())
    }

    /// One page of items matching `filter`, most recently updated first,
    /// plus the total match count.
    pub async fn search(
        pool: &PgPool,
        filter: &ItemFilter,
        page: PageRequest,
    ) -> Result<(Vec<ItemDetail>, i64), sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_item_filter(filter);

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM items {where_clause}");
        let count = bind_item_values_scalar(sqlx::query_scalar(&count_query), &bind_values)
            .fetch_one(pool);

        let limit_idx = bind_idx;
        let offset_idx = bind_idx + 1;
        let select_query = format!(
            "SELECT {COLUMNS} FROM items {where_clause} \
             ORDER BY updated_at DESC, id \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let rows = bind_item_values(sqlx::query_as::<_, Item>(&select_query), &bind_values)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool);

        let (items, total) = tokio::try_join!(rows, count)?;
        let details = Self::populate(pool, items).await?;
        Ok((details, total))
    }

    /// Dereference category, color and attribute values for a batch of
    /// items, preserving order.
    pub async fn populate(pool: &PgPool, items: Vec<Item>) -> Result<Vec<ItemDetail>, sqlx::Error> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let item_ids: Vec<DbId> = items.iter().map(|i| i.id).collect();
        let category_ids = distinct(items.iter().filter_map(|i| i.category_id));
        let color_ids = distinct(items.iter().filter_map(|i| i.color_id));

        let values = sqlx::query_as::<_, ItemAttributeValue>(
            "SELECT ia.item_id, ia.attribute_id, a.name AS attribute_name, ia.value \
             FROM item_attributes ia \
             LEFT JOIN attributes a ON a.id = ia.attribute_id \
             WHERE ia.item_id = ANY($1) \
             ORDER BY ia.item_id, ia.position",
        )
        .bind(&item_ids)
        .fetch_all(pool);

        let (categories, colors, values) = tokio::try_join!(
            CategoryRepo::find_many(pool, &category_ids),
            ColorRepo::find_many(pool, &color_ids),
            values,
        )?;

        let categories: HashMap<DbId, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        let colors: HashMap<DbId, Color> = colors.into_iter().map(|c| (c.id, c)).collect();
        let mut attributes: HashMap<DbId, Vec<ItemAttributeValue>> = HashMap::new();
        for value in values {
            attributes.entry(value.item_id).or_default().push(value);
        }

        Ok(items
            .into_iter()
            .map(|item| ItemDetail {
                category: item.category_id.and_then(|id| categories.get(&id).cloned()),
                color: item.color_id.and_then(|id| colors.get(&id).cloned()),
                // Guarded by ck_items_status.
                status: item.status.parse().unwrap_or(ItemStatus::Unknown),
                attributes: attributes.remove(&item.id).unwrap_or_default(),
                id: item.id,
                name: item.name,
                comment: item.comment,
                image_url: item.image_url,
                width: item.width,
                length: item.length,
                height: item.height,
                created_at: item.created_at,
                updated_at: item.updated_at,
            })
            .collect())
    }
}

/// Replace the attribute values of an item, keeping the given order.
async fn replace_attributes(
    conn: &mut PgConnection,
    item_id: DbId,
    attributes: &[AttributeValueInput],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM item_attributes WHERE item_id = $1")
        .bind(item_id)
        .execute(&mut *conn)
        .await?;

    if attributes.is_empty() {
        return Ok(());
    }

    let attribute_ids: Vec<DbId> = attributes.iter().map(|a| a.attribute).collect();
    let values: Vec<Option<String>> = attributes.iter().map(|a| a.value.clone()).collect();

    sqlx::query(
        "INSERT INTO item_attributes (item_id, position, attribute_id, value) \
         SELECT $1, v.ord::INTEGER, v.attribute_id, v.value \
         FROM UNNEST($2::uuid[], $3::text[]) WITH ORDINALITY AS v(attribute_id, value, ord)",
    )
    .bind(item_id)
    .bind(&attribute_ids)
    .bind(&values)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn distinct(ids: impl Iterator<Item = DbId>) -> Vec<DbId> {
    let mut ids: Vec<DbId> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built item queries.
#[derive(Debug, PartialEq)]
enum BindValue {
    Text(String),
    Id(DbId),
}

/// Build a WHERE clause and bind values from a resolved [`ItemFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_item_filter(filter: &ItemFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref prefix) = filter.id_prefix {
        conditions.push(format!("id::text LIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("{}%", escape_like(prefix))));
    }

    if let Some(status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(ref name) = filter.name {
        conditions.push(format!("name ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(contains_pattern(name)));
    }

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Id(category_id));
    }

    if let Some(color_id) = filter.color_id {
        conditions.push(format!("color_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Id(color_id));
    }

    for attribute in &filter.attributes {
        let value_idx = bind_idx + 1;
        conditions.push(format!(
            "EXISTS (SELECT 1 FROM item_attributes ia \
             WHERE ia.item_id = items.id AND ia.attribute_id = ${bind_idx} AND ia.value = ${value_idx})"
        ));
        bind_idx += 2;
        bind_values.push(BindValue::Id(attribute.attribute_id));
        bind_values.push(BindValue::Text(attribute.value.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_item_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Id(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_item_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Id(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use stockroom_core::item_query::AttributeMatch;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, values, next) = build_item_filter(&ItemFilter::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn scalar_filters_are_numbered_in_order() {
        let category = Uuid::new_v4();
        let filter = ItemFilter {
            status: Some(ItemStatus::OutOfWarehouse),
            name: Some("drill".into()),
            category_id: Some(category),
            ..ItemFilter::default()
        };

        let (clause, values, next) = build_item_filter(&filter);

        assert_eq!(
            clause,
            "WHERE status = $1 AND name ILIKE $2 AND category_id = $3"
        );
        assert_eq!(
            values,
            vec![
                BindValue::Text("OUT_OF_WAREHOUSE".into()),
                BindValue::Text("%drill%".into()),
                BindValue::Id(category),
            ]
        );
        assert_eq!(next, 4);
    }

    #[test]
    fn id_prefix_is_escaped_verbatim() {
        let filter = ItemFilter {
            id_prefix: Some("AB_".into()),
            ..ItemFilter::default()
        };

        let (clause, values, _) = build_item_filter(&filter);

        assert_eq!(clause, "WHERE id::text LIKE $1");
        assert_eq!(values, vec![BindValue::Text("AB\\_%".into())]);
    }

    #[test]
    fn each_attribute_adds_its_own_exists_predicate() {
        let size = Uuid::new_v4();
        let material = Uuid::new_v4();
        let filter = ItemFilter {
            color_id: Some(Uuid::new_v4()),
            attributes: vec![
                AttributeMatch {
                    attribute_id: size,
                    value: "Large".into(),
                },
                AttributeMatch {
                    attribute_id: material,
                    value: "Steel".into(),
                },
            ],
            ..ItemFilter::default()
        };

        let (clause, values, next) = build_item_filter(&filter);

        assert_eq!(clause.matches("EXISTS (").count(), 2);
        assert!(clause.contains("ia.attribute_id = $2 AND ia.value = $3"));
        assert!(clause.contains("ia.attribute_id = $4 AND ia.value = $5"));
        assert_eq!(values.len(), 5);
        assert_eq!(values[3], BindValue::Id(material));
        assert_eq!(next, 6);
    }

    #[test]
    fn distinct_sorts_and_dedups() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = distinct([a, b, a].into_iter());
        assert_eq!(ids.len(), 2);
    }
}
