mod admin;
mod dashboard;
mod equipment;
mod export;
mod health;
mod middlewares;
mod swagger;
mod user;
use crate::database;
use crate::database::MaintenanceDatabase;
use crate::models::user::ROLE_ADMIN;
use crate::models::User;
use crate::security;
use chrono::Utc;
use health::health_checker_handler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{AppState, Config};

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::error::Error;
use std::sync::Arc;

pub async fn make_app() -> Result<Router, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    let config = Config::init();
    info!("Connecting to PostgreSQL...");
    let sqlx_db_connection = database::connect_sqlx(&config.db_url).await;
    info!("Connected to PostgreSQL!");

    let cors = build_cors(&config.cors_url)?;

    let db = MaintenanceDatabase::new(sqlx_db_connection);
    seed_admin(&db).await?;

    let state = Arc::new(AppState { db, config });
    let ret = Router::new()
        .route("/api", get(health_checker_handler))
        .route("/api/health", get(health_checker_handler))
        .merge(user::user_routes(state.clone()))
        .nest("/api/admin/users", admin::admin_routes(state.clone()))
        .nest("/api/equipment", equipment::equipment_routes(state.clone()))
        .nest("/api/dashboard", dashboard::dashboard_routes(state.clone()))
        .nest("/api/export", export::export_routes(state.clone()))
        .merge(swagger::build_documentation())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(ret)
}

fn build_cors(cors_url: &str) -> Result<CorsLayer, Box<dyn Error>> {
    // Credentialed requests cannot use a wildcard origin.
    let cors = if cors_url == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_origin(cors_url.parse::<HeaderValue>()?)
            .allow_credentials(true)
    };
    Ok(cors
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]))
}

/// Create the bootstrap admin account on first start so the user-management
/// endpoints are reachable on a fresh database.
async fn seed_admin(db: &MaintenanceDatabase) -> Result<(), Box<dyn Error>> {
    if db.get_user_by_username("admin").await?.is_some() {
        return Ok(());
    }

    let password_hash = security::hash_password("admin123").map_err(|e| e.to_string())?;
    let admin = User {
        id: Uuid::new_v4(),
        username: "admin".to_string(),
        email: "admin@mantenimiento.com".to_string(),
        full_name: "Administrador del Sistema".to_string(),
        role: ROLE_ADMIN.to_string(),
        is_active: true,
        must_change_password: false,
        password_hash,
        created_at: Utc::now(),
        last_login: None,
    };
    db.create_user(&admin).await?;
    warn!("Admin user created with username: admin and the default password; change it");
    Ok(())
}
