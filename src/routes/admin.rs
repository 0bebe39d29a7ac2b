use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{post, put},
    Json, Router,
};
use chrono::Utc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{
    models::{
        dto::{AdminCreateUser, Message, PasswordReset, Profile, UserUpdate},
        user::{normalize_email, ROLES},
        Error, User,
    },
    security, AppState,
};

use super::middlewares::{admin_guard, auth_guard};

#[derive(OpenApi)]
#[openapi(paths(
    create_user_handler,
    list_users_handler,
    update_user_handler,
    reset_password_handler,
    delete_user_handler
))]
/// Defines the OpenAPI spec for user-administration endpoints
pub struct AdminApi;

/// Used to group user-administration endpoints together in the OpenAPI documentation
pub const ADMIN_API_GROUP: &str = "ADMIN";

/// Builds a router for the admin-only user management routes
pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user_handler).get(list_users_handler))
        .route(
            "/:id",
            put(update_user_handler).delete(delete_user_handler),
        )
        .route("/:id/reset-password", post(reset_password_handler))
        .route_layer(middleware::from_fn(admin_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Create user with temporary password handler function
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = ADMIN_API_GROUP,
    request_body = AdminCreateUser,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "User created", body = Profile),
        (status = 400, description = "Username or email already registered"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdminCreateUser>,
) -> Result<Json<Profile>, Error> {
    if !ROLES.contains(&body.role.as_str()) {
        return Err(Error::validation("role must be one of: admin, user"));
    }

    // Probe with the normalized email that gets stored (see normalize_email).
    let email = normalize_email(&body.email);
    if state
        .db
        .get_user_by_username_or_email(&body.username, &email)
        .await?
        .is_some()
    {
        return Err(Error::new(
            StatusCode::BAD_REQUEST,
            "Username or email already registered",
        ));
    }

    let password_hash = security::hash_password(&body.temporary_password)?;

    let user = User {
        id: Uuid::new_v4(),
        username: body.username,
        email,
        full_name: body.full_name,
        role: body.role,
        is_active: true,
        // Temporary credential: the user must pick their own on first login.
        must_change_password: true,
        password_hash,
        created_at: Utc::now(),
        last_login: None,
    };

    let user = state.db.create_user(&user).await?;
    Ok(Json(Profile::from(user)))
}

/// List users handler function
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = ADMIN_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "All user accounts", body = [Profile]),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_users_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Profile>>, Error> {
    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(Profile::from).collect()))
}

/// Partial user update handler function
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = ADMIN_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UserUpdate,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Updated user", body = Profile),
        (status = 404, description = "User not found"),
    )
)]
pub async fn update_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserUpdate>,
) -> Result<Json<Profile>, Error> {
    if let Some(ref role) = body.role {
        if !ROLES.contains(&role.as_str()) {
            return Err(Error::validation("role must be one of: admin, user"));
        }
    }

    let mut user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))?;

    if let Some(full_name) = body.full_name {
        user.full_name = full_name;
    }
    if let Some(email) = body.email {
        let email = normalize_email(&email);
        // Re-pointing the account at another user's email would otherwise
        // only fail at the unique index, as a 500.
        if let Some(existing) = state.db.get_user_by_email(&email).await? {
            if existing.id != id {
                return Err(Error::new(
                    StatusCode::BAD_REQUEST,
                    "Email already registered",
                ));
            }
        }
        user.email = email;
    }
    if let Some(is_active) = body.is_active {
        user.is_active = is_active;
    }
    if let Some(role) = body.role {
        user.role = role;
    }

    let user = state.db.update_user(&user).await?;
    Ok(Json(Profile::from(user)))
}

/// Force-set password handler function
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reset-password",
    tag = ADMIN_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = PasswordReset,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Password reset", body = Message),
        (status = 404, description = "User not found"),
    )
)]
pub async fn reset_password_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<PasswordReset>,
) -> Result<Json<Message>, Error> {
    let password_hash = security::hash_password(&body.new_password)?;
    // An admin-set password is temporary by definition.
    let affected = state.db.set_password(id, &password_hash, true).await?;
    if affected == 0 {
        return Err(Error::not_found("User not found"));
    }
    Ok(Json(Message::new("Password reset successfully")))
}

/// Delete user handler function
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = ADMIN_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "User deleted", body = Message),
        (status = 404, description = "User not found"),
    )
)]
pub async fn delete_user_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, Error> {
    let affected = state.db.delete_user(id).await?;
    if affected == 0 {
        return Err(Error::not_found("User not found"));
    }
    // Equipment rows keep the deleted user's name in created_by/updated_by;
    // the reference is by value, not a foreign key.
    Ok(Json(Message::new("User deleted successfully")))
}
