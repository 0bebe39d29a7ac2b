use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    models::{Error, User},
    security, AppState,
};

const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// Resolves the bearer token to a user row and stashes it as a request
/// extension for handlers to pick up via `Extension<User>`.
pub async fn auth_guard(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Error::unauthorized(CREDENTIALS_MESSAGE))?;

    let username = security::validate_token(token, &state.config.jwt_secret)
        .map_err(|e| Error::unauthorized(e.message()))?;

    // A valid token for a since-deleted account is still a 401.
    let user = state
        .db
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| Error::unauthorized(CREDENTIALS_MESSAGE))?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Must be layered inside [`auth_guard`] so the user extension is present.
pub async fn admin_guard(
    Extension(user): Extension<User>,
    req: Request,
    next: Next,
) -> Result<Response, Error> {
    if !user.is_admin() {
        return Err(Error::forbidden("Not enough permissions"));
    }
    Ok(next.run(req).await)
}
