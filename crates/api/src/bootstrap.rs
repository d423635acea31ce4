//! Startup seeding.

use stockroom_core::roles::ROLE_ADMIN;
use stockroom_db::models::user::CreateUser;
use stockroom_db::repositories::UserRepo;
use stockroom_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the bootstrap administrator unless a user with that email exists.
///
/// Returns `true` when a new account was created.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::find_by_email(pool, &admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Bootstrap admin already present");
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: admin.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
            first_name: None,
            last_name: None,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
