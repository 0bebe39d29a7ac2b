use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{
    models::{
        dto::{EquipmentCreate, EquipmentFilter, EquipmentUpdate, Message, PageParams},
        Equipment, Error, User,
    },
    AppState,
};

use super::middlewares::{admin_guard, auth_guard};

#[derive(OpenApi)]
#[openapi(paths(
    create_equipment_handler,
    list_equipment_handler,
    filter_equipment_handler,
    update_equipment_handler,
    delete_equipment_handler
))]
/// Defines the OpenAPI spec for equipment endpoints
pub struct EquipmentApi;

/// Used to group equipment endpoints together in the OpenAPI documentation
pub const EQUIPMENT_API_GROUP: &str = "EQUIPMENT";

/// Builds a router for the equipment routes. Creation and reads are open to
/// any authenticated user; edits and deletes are admin-only.
pub fn equipment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin_only = Router::new()
        .route(
            "/:id",
            put(update_equipment_handler).delete(delete_equipment_handler),
        )
        .route_layer(middleware::from_fn(admin_guard));

    Router::new()
        .route(
            "/",
            post(create_equipment_handler).get(list_equipment_handler),
        )
        .route("/filter", post(filter_equipment_handler))
        .merge(admin_only)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Create equipment record handler function
#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = EQUIPMENT_API_GROUP,
    request_body = EquipmentCreate,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Record created", body = Equipment),
        (status = 422, description = "Invalid field value"),
    )
)]
pub async fn create_equipment_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Json(body): Json<EquipmentCreate>,
) -> Result<Json<Equipment>, Error> {
    body.validate().map_err(|msg| Error::validation(&msg))?;

    // Creator identity comes from the token, never from the payload.
    let record = Equipment {
        id: Uuid::new_v4(),
        area: body.area,
        equipment_type: body.equipment_type,
        nombre_pc: body.nombre_pc,
        marca: body.marca,
        modelo: body.modelo,
        serie: body.serie,
        fecha: body.fecha,
        tipo_mantenimiento: body.tipo_mantenimiento,
        observaciones: body.observaciones,
        tecnico_responsable: caller.full_name,
        estado_equipo: body.estado_equipo,
        created_by: caller.username,
        created_at: Utc::now(),
        updated_at: None,
        updated_by: None,
    };

    let record = state.db.create_equipment(&record).await?;
    Ok(Json(record))
}

/// List equipment records handler function
#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = EQUIPMENT_API_GROUP,
    params(PageParams),
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Newest-first page of records", body = [Equipment]),
    )
)]
pub async fn list_equipment_handler(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<Equipment>>, Error> {
    let (skip, limit) = clamp_page(&page, state.config.max_page_size);
    let records = state.db.list_equipment(skip, limit).await?;
    Ok(Json(records))
}

/// Filtered equipment listing handler function
#[utoipa::path(
    post,
    path = "/api/equipment/filter",
    tag = EQUIPMENT_API_GROUP,
    params(PageParams),
    request_body = EquipmentFilter,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Newest-first page of matching records", body = [Equipment]),
    )
)]
pub async fn filter_equipment_handler(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
    Json(filters): Json<EquipmentFilter>,
) -> Result<Json<Vec<Equipment>>, Error> {
    let (skip, limit) = clamp_page(&page, state.config.max_page_size);
    let records = state.db.filter_equipment(&filters, skip, limit).await?;
    Ok(Json(records))
}

/// Update equipment record handler function
#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    tag = EQUIPMENT_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "Equipment record ID")
    ),
    request_body = EquipmentUpdate,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Updated record", body = Equipment),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Equipment not found"),
    )
)]
pub async fn update_equipment_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<User>,
    Path(id): Path<Uuid>,
    Json(body): Json<EquipmentUpdate>,
) -> Result<Json<Equipment>, Error> {
    body.validate().map_err(|msg| Error::validation(&msg))?;

    let mut record = state
        .db
        .get_equipment_by_id(id)
        .await?
        .ok_or_else(|| Error::not_found("Equipment not found"))?;

    record.apply_update(body, &caller.username);

    let record = state.db.update_equipment(&record).await?;
    Ok(Json(record))
}

/// Delete equipment record handler function
#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    tag = EQUIPMENT_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "Equipment record ID")
    ),
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Record deleted", body = Message),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Equipment not found"),
    )
)]
pub async fn delete_equipment_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Message>, Error> {
    let affected = state.db.delete_equipment(id).await?;
    if affected == 0 {
        return Err(Error::not_found("Equipment not found"));
    }
    Ok(Json(Message::new("Equipment deleted successfully")))
}

/// Normalize client paging: negative values floor to zero, `limit` caps at
/// the configured page bound.
fn clamp_page(page: &PageParams, max_page_size: i64) -> (i64, i64) {
    let skip = page.skip.max(0);
    let limit = page.limit.clamp(0, max_page_size);
    (skip, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_page_bounds_limit_and_skip() {
        let page = PageParams {
            skip: -3,
            limit: 5000,
        };
        assert_eq!(clamp_page(&page, 1000), (0, 1000));

        let page = PageParams { skip: 20, limit: 50 };
        assert_eq!(clamp_page(&page, 1000), (20, 50));
    }
}
