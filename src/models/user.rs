use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

pub const ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// A user account row. `password_hash` never leaves the server; clients
/// only ever see the [`Profile`][crate::models::dto::Profile] projection.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub must_change_password: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Emails are stored lowercased. Every comparison against the unique email
/// index must go through the same normalization as the stored value,
/// otherwise a mixed-case duplicate slips past the probe and surfaces as a
/// constraint violation instead of a clean conflict response.
pub fn normalize_email(email: &str) -> String {
    email.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_lowercases_mixed_case() {
        assert_eq!(normalize_email("Bob@Example.COM"), "bob@example.com");
    }

    #[test]
    fn normalize_email_leaves_lowercase_untouched() {
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }
}
