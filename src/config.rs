use std::env;

/// Process-wide configuration, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub jwt_secret: String,
    pub cors_url: String,
    /// Lifetime of issued bearer tokens, in minutes.
    pub token_ttl_minutes: i64,
    /// Hard cap on `limit` for paginated equipment listings.
    pub max_page_size: i64,
    /// Upper bound on rows fetched for a spreadsheet export.
    pub export_row_limit: i64,
}

impl Config {
    pub fn init() -> Config {
        let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let cors_url = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());
        let token_ttl_minutes = env_or("TOKEN_TTL_MINUTES", 30);
        let max_page_size = env_or("MAX_PAGE_SIZE", 1000);
        let export_row_limit = env_or("EXPORT_ROW_LIMIT", 10000);

        Config {
            db_url,
            jwt_secret,
            cors_url,
            token_ttl_minutes,
            max_page_size,
            export_row_limit,
        }
    }
}

fn env_or(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
