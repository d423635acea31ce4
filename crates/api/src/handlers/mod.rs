//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `stockroom_db` and map errors
//! via [`AppError`](crate::error::AppError).

pub mod attribute;
pub mod auth;
pub mod category;
pub mod color;
pub mod item;
pub mod upload;
pub mod user;
