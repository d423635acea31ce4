//! Row models, read views and DTOs.
//!
//! Wire format is camelCase to match the HTTP API; image URLs serialize as
//! `imageURL`.

pub mod attribute;
pub mod category;
pub mod color;
pub mod item;
pub mod user;
