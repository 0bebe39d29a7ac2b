use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, middleware, routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    models::{
        dto::{DashboardStats, RecentMaintenance},
        Error,
    },
    AppState,
};

use super::middlewares::auth_guard;

/// How many of the latest records the dashboard surfaces.
const RECENT_LIMIT: i64 = 5;

#[derive(OpenApi)]
#[openapi(paths(dashboard_stats_handler))]
/// Defines the OpenAPI spec for the dashboard endpoint
pub struct DashboardApi;

/// Used to group the dashboard endpoint in the OpenAPI documentation
pub const DASHBOARD_API_GROUP: &str = "DASHBOARD";

/// Builds a router for the dashboard route
pub fn dashboard_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(dashboard_stats_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Dashboard statistics handler function
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = DASHBOARD_API_GROUP,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Aggregate statistics over the whole registry", body = DashboardStats),
    )
)]
pub async fn dashboard_stats_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardStats>, Error> {
    // All aggregations run over the full, unfiltered registry, so the total
    // always equals the sum of each group-by breakdown.
    let total_equipments = state.db.count_equipment().await?;
    let equipments_by_type = into_counts(state.db.counts_by_equipment_type().await?);
    let equipments_by_status = into_counts(state.db.counts_by_estado().await?);
    let maintenance_by_type = into_counts(state.db.counts_by_tipo_mantenimiento().await?);

    let recent_maintenances = state
        .db
        .recent_equipment(RECENT_LIMIT)
        .await?
        .into_iter()
        .map(RecentMaintenance::from)
        .collect();

    Ok(Json(DashboardStats {
        total_equipments,
        equipments_by_type,
        equipments_by_status,
        maintenance_by_type,
        recent_maintenances,
    }))
}

fn into_counts(rows: Vec<(String, i64)>) -> HashMap<String, i64> {
    rows.into_iter().collect()
}
