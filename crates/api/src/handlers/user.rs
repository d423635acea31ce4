//! Handlers for the `/users` resource.
//!
//! All handlers except [`change_password`] require the `admin` role via
//! [`RequireAdmin`]. Responses never carry the password hash.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::{PageRequest, Paginated};
use stockroom_core::password::validate_password;
use stockroom_core::roles::{ROLE_USER, VALID_ROLES};
use stockroom_core::types::DbId;
use stockroom_db::models::user::{CreateUser, UpdateUser, UserListParams, UserResponse};
use stockroom_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::Empty;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for `PUT /users/{id}/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn validate_role(role: &str) -> AppResult<()> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))))
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email is required".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/users
///
/// Rejects a duplicate email with 409 before hashing.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let email = input.email.trim().to_string();
    validate_email(&email)?;
    validate_password(&input.password)?;
    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    validate_role(&role)?;

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            role,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User created");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users?page=&itemsPerPage=&role=&search=
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let page =
        PageRequest::from_params(params.page.as_deref(), params.items_per_page.as_deref());
    let (users, total) = UserRepo::list_page(
        &state.pool,
        params.role.as_deref(),
        params.search.as_deref(),
        page,
    )
    .await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new_or_empty(users, total, page)))
}

/// GET /api/v1/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{id}
///
/// A `password` field in the body is ignored; use the password endpoint.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(email) = input.email.as_mut() {
        *email = email.trim().to_string();
        validate_email(email)?;
    }
    if let Some(role) = &input.role {
        validate_role(role)?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Empty>> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(Empty::default()))
}

/// PUT /api/v1/users/{id}/password
///
/// Allowed for admins and for the user changing their own password.
pub async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<UserResponse>> {
    if !caller.is_admin() && caller.user_id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot change another user's password".into(),
        )));
    }
    validate_password(&input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %id, "Password changed");

    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(user.into()))
}
