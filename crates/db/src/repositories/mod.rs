//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attribute_repo;
pub mod category_repo;
pub mod color_repo;
pub mod item_repo;
pub mod lookup;
pub mod user_repo;

pub use attribute_repo::AttributeRepo;
pub use category_repo::CategoryRepo;
pub use color_repo::ColorRepo;
pub use item_repo::ItemRepo;
pub use lookup::PgReferenceLookup;
pub use user_repo::UserRepo;

/// Escape `LIKE` wildcards so `term` matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `%term%` pattern for case-insensitive substring search with `ILIKE`.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}
