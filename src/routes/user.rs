use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{
    models::{
        dto::{LoginInfo, Message, PasswordChange, Profile, RegisterInfo, TokenResponse},
        user::{normalize_email, ROLE_USER},
        Error, User,
    },
    security, AppState,
};

use super::middlewares::auth_guard;

#[derive(OpenApi)]
#[openapi(paths(
    register_user_handler,
    login_handler,
    get_me_handler,
    change_password_handler
))]
/// Defines the OpenAPI spec for account endpoints
pub struct UsersApi;

/// Used to group account endpoints together in the OpenAPI documentation
pub const USER_API_GROUP: &str = "AUTH";

/// Builds a router for registration, login and self-service account routes.
/// These sit directly under /api, so the paths here are absolute and the
/// router is merged rather than nested.
pub fn user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register", post(register_user_handler))
        .route("/api/login", post(login_handler))
        .route(
            "/api/me",
            get(get_me_handler)
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard)),
        )
        .route(
            "/api/change-password",
            post(change_password_handler)
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard)),
        )
}

// Register handler function
#[utoipa::path(
    post,
    path = "/api/register",
    tag = USER_API_GROUP,
    request_body = RegisterInfo,
    responses(
        (status = 200, description = "User successfully registered", body = Profile),
        (status = 400, description = "Username or email already registered"),
        (status = 403, description = "Only normal users can self-register"),
    )
)]
pub async fn register_user_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterInfo>,
) -> Result<impl IntoResponse, Error> {
    // Self-registration never grants elevated roles.
    if body.role != ROLE_USER {
        return Err(Error::forbidden(
            "Only normal users can be registered through this endpoint",
        ));
    }

    // Probe with the same normalized email that gets stored, so a
    // mixed-case duplicate is caught here and not by the unique index.
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

    let password_hash =
        security::hash_password(&body.password).map_err(Error::from)?;

    let user = User {
        id: Uuid::new_v4(),
        username: body.username,
        email,
        full_name: body.full_name,
        role: ROLE_USER.to_string(),
        is_active: true,
        must_change_password: false,
        password_hash,
        created_at: Utc::now(),
        last_login: None,
    };

    let user = state.db.create_user(&user).await?;
    Ok(Json(Profile::from(user)))
}

// Login handler function
#[utoipa::path(
    post,
    path = "/api/login",
    tag = USER_API_GROUP,
    request_body = LoginInfo,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginInfo>,
) -> Result<impl IntoResponse, Error> {
    // Same message whether the username is unknown or the password is wrong,
    // so login failures cannot be used to enumerate accounts.
    let invalid = || Error::unauthorized("Incorrect username or password");

    let mut user = state
        .db
        .get_user_by_username(&body.username)
        .await?
        .ok_or_else(invalid)?;

    if !security::verify_password(&body.password, &user.password_hash) {
        return Err(invalid());
    }

    let access_token = security::issue_token(
        &user.username,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )?;

    let now = Utc::now();
    state.db.touch_last_login(&user.username, now).await?;
    user.last_login = Some(now);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: Profile::from(user),
    }))
}

// Get own profile handler function
#[utoipa::path(
    get,
    path = "/api/me",
    tag = USER_API_GROUP,
    responses(
        (status = 200, description = "Caller profile", body = Profile),
        (status = 401, description = "Invalid or expired token"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn get_me_handler(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(Profile::from(user))
}

// Change own password handler function
#[utoipa::path(
    post,
    path = "/api/change-password",
    tag = USER_API_GROUP,
    request_body = PasswordChange,
    responses(
        (status = 200, description = "Password changed", body = Message),
        (status = 400, description = "Current password is incorrect"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
pub async fn change_password_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(body): Json<PasswordChange>,
) -> Result<impl IntoResponse, Error> {
    if !security::verify_password(&body.current_password, &user.password_hash) {
        return Err(Error::new(
            StatusCode::BAD_REQUEST,
            "Current password is incorrect",
        ));
    }

    let password_hash =
        security::hash_password(&body.new_password).map_err(Error::from)?;
    // Picking their own password clears any pending forced change.
    state.db.set_password(user.id, &password_hash, false).await?;

    Ok(Json(Message::new("Password updated successfully")))
}
