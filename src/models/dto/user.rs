use crate::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Client-facing view of a user account. Deliberately omits the password
/// hash; converting through this type is the only way user rows are
/// serialized in responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[schema(example = "user")]
    pub role: String,
    pub is_active: bool,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            must_change_password: user.must_change_password,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterInfo {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Anything other than "user" is rejected on the public endpoint.
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    crate::models::user::ROLE_USER.to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginInfo {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: Profile,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminCreateUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub temporary_password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordReset {
    pub new_password: String,
}
