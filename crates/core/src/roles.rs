//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// All roles accepted when creating or updating a user.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];
