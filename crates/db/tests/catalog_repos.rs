//! Integration tests for the catalog repositories.
//!
//! Exercises the repository layer against a real database:
//! - Category attribute links and item counts
//! - Delete followed by reference clearing
//! - Filtered and paginated item search
//! - Name lookups used by query resolution

use sqlx::PgPool;
use stockroom_core::item_query::{
    resolve_item_query, AttributeMatch, ItemFilter, ItemQuery, ReferenceKind, ReferenceLookup,
    Resolution,
};
use stockroom_core::item_status::ItemStatus;
use stockroom_core::pagination::PageRequest;
use stockroom_core::types::DbId;
use stockroom_db::models::attribute::CreateAttribute;
use stockroom_db::models::category::{CreateCategory, UpdateCategory};
use stockroom_db::models::color::CreateColor;
use stockroom_db::models::item::{AttributeValueInput, CreateItem, UpdateItem};
use stockroom_db::repositories::{
    AttributeRepo, CategoryRepo, ColorRepo, ItemRepo, PgReferenceLookup,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn attribute(pool: &PgPool, name: &str) -> DbId {
    AttributeRepo::create(
        pool,
        &CreateAttribute {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn category(pool: &PgPool, name: &str, attributes: Vec<DbId>) -> DbId {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            attributes,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn color(pool: &PgPool, name: &str, hex: &str) -> DbId {
    ColorRepo::create(
        pool,
        &CreateColor {
            name: name.to_string(),
            color: hex.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn new_item(name: &str, category: DbId) -> CreateItem {
    CreateItem {
        category: Some(category),
        name: Some(name.to_string()),
        ..CreateItem::default()
    }
}

fn value(attribute: DbId, value: &str) -> AttributeValueInput {
    AttributeValueInput {
        attribute,
        value: Some(value.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_detail_keeps_attribute_order_and_counts_items(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let material = attribute(&pool, "Material").await;
    let tools = category(&pool, "Tools", vec![material, size]).await;

    ItemRepo::create(&pool, &new_item("Hammer", tools)).await.unwrap();
    ItemRepo::create(&pool, &new_item("Saw", tools)).await.unwrap();

    let detail = CategoryRepo::find_detail(&pool, tools).await.unwrap().unwrap();
    let names: Vec<&str> = detail.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Material", "Size"]);
    assert_eq!(detail.item_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_update_replaces_attribute_links(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let weight = attribute(&pool, "Weight").await;
    let tools = category(&pool, "Tools", vec![size]).await;

    let update = UpdateCategory {
        name: Some("Hand tools".into()),
        attributes: Some(vec![weight]),
        image_url: None,
    };
    let updated = CategoryRepo::update(&pool, tools, &update).await.unwrap().unwrap();
    assert_eq!(updated.name, "Hand tools");

    let detail = CategoryRepo::find_detail(&pool, tools).await.unwrap().unwrap();
    assert_eq!(detail.attributes.len(), 1);
    assert_eq!(detail.attributes[0].id, weight);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_page_is_sorted_by_name(pool: PgPool) {
    for name in ["Zinc", "alpha", "Beta"] {
        category(&pool, name, vec![]).await;
    }

    let (page, total) = CategoryRepo::list_page(&pool, None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 3);

    let (filtered, total) = CategoryRepo::list_page(&pool, Some("ET"), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(filtered[0].category.name, "Beta");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_delete_then_clear_keeps_items(pool: PgPool) {
    let tools = category(&pool, "Tools", vec![]).await;
    let item = ItemRepo::create(&pool, &new_item("Hammer", tools)).await.unwrap();

    assert!(CategoryRepo::delete(&pool, tools).await.unwrap());
    assert_eq!(ItemRepo::clear_category(&pool, tools).await.unwrap(), 1);

    let reloaded = ItemRepo::find_by_id(&pool, item.id).await.unwrap().unwrap();
    assert!(reloaded.category_id.is_none());
    assert!(!CategoryRepo::delete(&pool, tools).await.unwrap());
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_color_delete_then_clear_keeps_items(pool: PgPool) {
    let tools = category(&pool, "Tools", vec![]).await;
    let red = color(&pool, "Red", "#FF0000").await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            color: Some(red),
            ..new_item("Hammer", tools)
        },
    )
    .await
    .unwrap();

    assert!(ColorRepo::delete(&pool, red).await.unwrap());
    ItemRepo::clear_color(&pool, red).await.unwrap();

    let detail = ItemRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert!(detail.color.is_none());
    assert_eq!(detail.category.map(|c| c.id), Some(tools));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_color_hex_is_enforced_by_schema(pool: PgPool) {
    let result = ColorRepo::create(
        &pool,
        &CreateColor {
            name: "Bad".into(),
            color: "red".into(),
        },
    )
    .await;
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_detail_populates_references_and_attributes(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let tools = category(&pool, "Tools", vec![size]).await;
    let red = color(&pool, "Red", "#FF0000").await;

    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            color: Some(red),
            status: Some(ItemStatus::OutOfWarehouse),
            width: Some(1.5),
            attributes: vec![value(size, "Large")],
            ..new_item("Hammer", tools)
        },
    )
    .await
    .unwrap();

    let detail = ItemRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(detail.category.unwrap().name, "Tools");
    assert_eq!(detail.color.unwrap().color, "#FF0000");
    assert_eq!(detail.status, ItemStatus::OutOfWarehouse);
    assert_eq!(detail.width, Some(1.5));
    assert_eq!(detail.attributes.len(), 1);
    assert_eq!(detail.attributes[0].attribute_name.as_deref(), Some("Size"));
    assert_eq!(detail.attributes[0].value.as_deref(), Some("Large"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_update_is_partial(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let tools = category(&pool, "Tools", vec![]).await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            comment: Some("heavy".into()),
            attributes: vec![value(size, "Large")],
            ..new_item("Hammer", tools)
        },
    )
    .await
    .unwrap();

    let update = UpdateItem {
        name: Some("Sledgehammer".into()),
        ..UpdateItem::default()
    };
    let updated = ItemRepo::update(&pool, item.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.name.as_deref(), Some("Sledgehammer"));
    assert_eq!(updated.comment.as_deref(), Some("heavy"));

    let detail = ItemRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    assert_eq!(detail.attributes.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_update_sets_keeps_and_clears_color(pool: PgPool) {
    let tools = category(&pool, "Tools", vec![]).await;
    let red = color(&pool, "Red", "#FF0000").await;
    let item = ItemRepo::create(&pool, &new_item("Hammer", tools)).await.unwrap();

    let set = UpdateItem {
        color: Some(Some(red)),
        ..UpdateItem::default()
    };
    let updated = ItemRepo::update(&pool, item.id, &set).await.unwrap().unwrap();
    assert_eq!(updated.color_id, Some(red));

    let rename = UpdateItem {
        name: Some("Mallet".into()),
        ..UpdateItem::default()
    };
    let updated = ItemRepo::update(&pool, item.id, &rename).await.unwrap().unwrap();
    assert_eq!(updated.color_id, Some(red));

    let clear = UpdateItem {
        color: Some(None),
        ..UpdateItem::default()
    };
    let updated = ItemRepo::update(&pool, item.id, &clear).await.unwrap().unwrap();
    assert_eq!(updated.color_id, None);
    assert_eq!(updated.name.as_deref(), Some("Mallet"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_set_attribute_value_touches_first_occurrence(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let weight = attribute(&pool, "Weight").await;
    let tools = category(&pool, "Tools", vec![]).await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            attributes: vec![value(size, "Small"), value(size, "Tiny")],
            ..new_item("Screw", tools)
        },
    )
    .await
    .unwrap();

    assert!(ItemRepo::set_attribute_value(&pool, item.id, size, Some("Large"))
        .await
        .unwrap());
    assert!(!ItemRepo::set_attribute_value(&pool, item.id, weight, Some("1kg"))
        .await
        .unwrap());

    let detail = ItemRepo::find_detail(&pool, item.id).await.unwrap().unwrap();
    let values: Vec<_> = detail
        .attributes
        .iter()
        .map(|a| a.value.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(values, vec!["Large", "Tiny"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_paginates_twelve_items(pool: PgPool) {
    let tools = category(&pool, "Tools", vec![]).await;
    for i in 0..12 {
        ItemRepo::create(&pool, &new_item(&format!("Item {i}"), tools))
            .await
            .unwrap();
    }

    let page = PageRequest::from_params(Some("2"), Some("5"));
    let (items, total) = ItemRepo::search(&pool, &ItemFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(total, 12);
    assert_eq!(items.len(), 5);

    let last = PageRequest::from_params(Some("3"), Some("5"));
    let (items, _) = ItemRepo::search(&pool, &ItemFilter::default(), last)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_requires_every_attribute_pair(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let material = attribute(&pool, "Material").await;
    let tools = category(&pool, "Tools", vec![size, material]).await;

    let both = ItemRepo::create(
        &pool,
        &CreateItem {
            attributes: vec![value(size, "Large"), value(material, "Steel")],
            ..new_item("Both", tools)
        },
    )
    .await
    .unwrap();
    ItemRepo::create(
        &pool,
        &CreateItem {
            attributes: vec![value(size, "Large"), value(material, "Wood")],
            ..new_item("Size only", tools)
        },
    )
    .await
    .unwrap();

    let filter = ItemFilter {
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
    let (items, total) = ItemRepo::search(&pool, &filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, both.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_by_id_prefix_status_and_name(pool: PgPool) {
    let tools = category(&pool, "Tools", vec![]).await;
    let hammer = ItemRepo::create(
        &pool,
        &CreateItem {
            status: Some(ItemStatus::Unknown),
            ..new_item("Claw Hammer", tools)
        },
    )
    .await
    .unwrap();
    ItemRepo::create(&pool, &new_item("Saw", tools)).await.unwrap();

    let prefix: String = hammer.id.to_string().chars().take(8).collect();
    let filter = ItemFilter {
        id_prefix: Some(prefix.clone()),
        status: Some(ItemStatus::Unknown),
        name: Some("hammer".into()),
        ..ItemFilter::default()
    };
    let (items, total) = ItemRepo::search(&pool, &filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, hammer.id);

    // The prefix match is case-sensitive against the lowercase id text.
    if prefix.chars().any(|c| c.is_ascii_alphabetic()) {
        let filter = ItemFilter {
            id_prefix: Some(prefix.to_uppercase()),
            ..ItemFilter::default()
        };
        let (_, total) = ItemRepo::search(&pool, &filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}

// ---------------------------------------------------------------------------
// Reference lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lookup_matches_names_case_insensitively(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let tools = category(&pool, "Tools", vec![]).await;
    let lookup = PgReferenceLookup::new(&pool);

    let found = lookup
        .find_by_name(ReferenceKind::Attribute, "SIZE")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, size);
    assert_eq!(found.name.as_deref(), Some("Size"));

    let found = lookup
        .find_by_name(ReferenceKind::Category, "tools")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, tools);

    assert!(lookup
        .find_by_id(ReferenceKind::Attribute, tools)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_query_by_category_name_round_trips(pool: PgPool) {
    let size = attribute(&pool, "Size").await;
    let tools = category(&pool, "Tools", vec![size]).await;
    let red = color(&pool, "Red", "#FF0000").await;
    let item = ItemRepo::create(
        &pool,
        &CreateItem {
            color: Some(red),
            attributes: vec![value(size, "Large")],
            ..new_item("Hammer", tools)
        },
    )
    .await
    .unwrap();

    let red_text = red.to_string();
    let query = ItemQuery::from_pairs([
        ("category".to_string(), "tools".to_string()),
        ("color".to_string(), red_text),
        ("attributes[size]".to_string(), "Large".to_string()),
    ]);
    let lookup = PgReferenceLookup::new(&pool);
    let Resolution::Resolved(filter) = resolve_item_query(&lookup, &query).await.unwrap() else {
        panic!("query should resolve");
    };

    let (items, total) = ItemRepo::search(&pool, &filter, query.page_request())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, item.id);
}
