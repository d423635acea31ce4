//! Postgres-backed [`ReferenceLookup`] for item query resolution.

use async_trait::async_trait;
use sqlx::PgPool;
use stockroom_core::item_query::{NamedRef, ReferenceKind, ReferenceLookup};
use stockroom_core::types::DbId;

use super::{AttributeRepo, CategoryRepo};

/// Resolves category and attribute references against the database.
pub struct PgReferenceLookup<'a> {
    pool: &'a PgPool,
}

impl<'a> PgReferenceLookup<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceLookup for PgReferenceLookup<'_> {
    type Error = sqlx::Error;

    async fn find_by_id(
        &self,
        kind: ReferenceKind,
        id: DbId,
    ) -> Result<Option<NamedRef>, Self::Error> {
        let found = match kind {
            ReferenceKind::Category => CategoryRepo::find_by_id(self.pool, id)
                .await?
                .map(|c| (c.id, c.name)),
            ReferenceKind::Attribute => AttributeRepo::find_by_id(self.pool, id)
                .await?
                .map(|a| (a.id, a.name)),
        };
        Ok(found.map(|(id, name)| NamedRef {
            id,
            name: Some(name),
        }))
    }

    async fn find_by_name(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<Option<NamedRef>, Self::Error> {
        let found = match kind {
            ReferenceKind::Category => CategoryRepo::find_by_name(self.pool, name)
                .await?
                .map(|c| (c.id, c.name)),
            ReferenceKind::Attribute => AttributeRepo::find_by_name(self.pool, name)
                .await?
                .map(|a| (a.id, a.name)),
        };
        Ok(found.map(|(id, name)| NamedRef {
            id,
            name: Some(name),
        }))
    }
}
