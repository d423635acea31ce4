//! Domain types, validation and the item query resolver for Stockroom.
//!
//! Nothing in this crate performs I/O. Database and storage access live in
//! `stockroom-db` and `stockroom-storage`; the resolver reaches the database
//! only through the [`item_query::ReferenceLookup`] trait.

pub mod color;
pub mod entity_kind;
pub mod error;
pub mod item_query;
pub mod item_status;
pub mod pagination;
pub mod password;
pub mod roles;
pub mod types;
