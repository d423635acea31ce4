//! Item query resolution.
//!
//! Turns the loosely-typed query parameters of the item list endpoint into a
//! fully resolved [`ItemFilter`]. Every filter value that cannot be resolved
//! (an unknown category name, a color that is not an identity, an unknown
//! attribute) produces [`Resolution::Missing`] instead of an error; callers
//! answer that with an empty page.
//!
//! Name and identity lookups go through [`ReferenceLookup`] so the algorithm
//! does not depend on a particular store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::item_status::ItemStatus;
use crate::pagination::PageRequest;
use crate::types::{parse_id, DbId};

/// Query-string prefix for attribute filters: `attributes[Size]=Large`.
const ATTRIBUTE_PARAM_PREFIX: &str = "attributes[";

// ---------------------------------------------------------------------------
// Raw request
// ---------------------------------------------------------------------------

/// Raw, unvalidated item list parameters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    /// Identity prefix.
    pub id: Option<String>,
    /// Category identity or name.
    pub category: Option<String>,
    /// Color identity.
    pub color: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive substring of the item name.
    pub name: Option<String>,
    pub page: Option<String>,
    pub items_per_page: Option<String>,
    /// Attribute identity-or-name mapped to the required value.
    pub attributes: BTreeMap<String, String>,
}

impl ItemQuery {
    /// Build a query from decoded query-string pairs.
    ///
    /// Empty values count as absent. Attribute filters use bracket syntax
    /// (`attributes[<key>]=<value>`); unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = ItemQuery::default();

        for (key, value) in pairs {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "id" => query.id = Some(value),
                "category" => query.category = Some(value),
                "color" => query.color = Some(value),
                "status" => query.status = Some(value),
                "name" => query.name = Some(value),
                "page" => query.page = Some(value),
                "itemsPerPage" => query.items_per_page = Some(value),
                other => {
                    if let Some(attr_key) = other
                        .strip_prefix(ATTRIBUTE_PARAM_PREFIX)
                        .and_then(|rest| rest.strip_suffix(']'))
                    {
                        if !attr_key.is_empty() {
                            query.attributes.insert(attr_key.to_string(), value);
                        }
                    }
                }
            }
        }

        query
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.items_per_page.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Reference resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving one filter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Resolved(T),
    Missing,
}

impl<T> Resolution<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Resolution::Resolved(value) => Some(value),
            Resolution::Missing => None,
        }
    }
}

/// Which collection a reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Category,
    Attribute,
}

impl ReferenceKind {
    /// Whether an identity-shaped value is accepted without checking that
    /// the row exists. Category filters use the identity as given;
    /// attribute filters need the stored name for value lookup.
    fn trusts_identity(self) -> bool {
        matches!(self, ReferenceKind::Category)
    }
}

/// A resolved reference. `name` is `None` when the identity was trusted
/// without a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: DbId,
    pub name: Option<String>,
}

/// Store access needed by the resolver.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    type Error: Send;

    async fn find_by_id(
        &self,
        kind: ReferenceKind,
        id: DbId,
    ) -> Result<Option<NamedRef>, Self::Error>;

    /// Case-insensitive exact name match.
    async fn find_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Option<NamedRef>, Self::Error>;
}

/// Resolve an identity-or-name value.
///
/// Identity-shaped values are looked up by identity (or trusted, for
/// categories); anything else is looked up by name.
pub async fn resolve_reference<L>(
    lookup: &L,
    kind: ReferenceKind,
    value: &str,
) -> Result<Resolution<NamedRef>, L::Error>
where
    L: ReferenceLookup + ?Sized,
{
    let found = match parse_id(value) {
        Some(id) if kind.trusts_identity() => Some(NamedRef { id, name: None }),
        Some(id) => lookup.find_by_id(kind, id).await?,
        None => lookup.find_by_name(kind, value).await?,
    };

    Ok(match found {
        Some(reference) => Resolution::Resolved(reference),
        None => Resolution::Missing,
    })
}

// ---------------------------------------------------------------------------
// Resolved filter
// ---------------------------------------------------------------------------

/// One required `(attribute, value)` pair on an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub attribute_id: DbId,
    pub value: String,
}

/// A fully resolved item filter. All predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub id_prefix: Option<String>,
    pub status: Option<ItemStatus>,
    pub name: Option<String>,
    pub category_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub attributes: Vec<AttributeMatch>,
}

/// Resolve every filter value in `query`.
///
/// Returns [`Resolution::Missing`] as soon as one value cannot be resolved.
/// Only lookup failures surface as errors.
pub async fn resolve_item_query<L>(
    lookup: &L,
    query: &ItemQuery,
) -> Result<Resolution<ItemFilter>, L::Error>
where
    L: ReferenceLookup + ?Sized,
{
    let mut filter = ItemFilter {
        id_prefix: query.id.clone(),
        name: query.name.clone(),
        ..ItemFilter::default()
    };

    if let Some(status) = &query.status {
        // An unknown status can never match a stored row.
        match status.parse::<ItemStatus>() {
            Ok(status) => filter.status = Some(status),
            Err(_) => return Ok(Resolution::Missing),
        }
    }

    if let Some(category) = &query.category {
        match resolve_reference(lookup, ReferenceKind::Category, category).await? {
            Resolution::Resolved(reference) => filter.category_id = Some(reference.id),
            Resolution::Missing => return Ok(Resolution::Missing),
        }
    }

    if let Some(color) = &query.color {
        match parse_id(color) {
            Some(id) => filter.color_id = Some(id),
            None => return Ok(Resolution::Missing),
        }
    }

    if !query.attributes.is_empty() {
        let resolved = try_join_all(
            query
                .attributes
                .keys()
                .map(|key| resolve_reference(lookup, ReferenceKind::Attribute, key)),
        )
        .await?;

        for ((_, supplied), resolution) in query.attributes.iter().zip(resolved) {
            let Resolution::Resolved(reference) = resolution else {
                return Ok(Resolution::Missing);
            };
            let value = attribute_value(&query.attributes, &reference).unwrap_or(supplied);
            filter.attributes.push(AttributeMatch {
                attribute_id: reference.id,
                value: value.clone(),
            });
        }
    }

    Ok(Resolution::Resolved(filter))
}

/// Value requested for a resolved attribute: by its name first, then by its
/// identity string.
fn attribute_value<'a>(
    attributes: &'a BTreeMap<String, String>,
    reference: &NamedRef,
) -> Option<&'a String> {
    reference
        .name
        .as_ref()
        .and_then(|name| attributes.get(name))
        .or_else(|| attributes.get(&reference.id.to_string()))
}
