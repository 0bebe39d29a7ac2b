use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    middleware,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use rust_xlsxwriter::{Workbook, XlsxError};
use utoipa::OpenApi;

use crate::{
    models::{dto::EquipmentFilter, Equipment, Error},
    AppState,
};

use super::middlewares::auth_guard;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const SHEET_NAME: &str = "Mantenimiento Equipos";
const EXPORT_FILENAME: &str = "reporte_mantenimiento.xlsx";

/// Fixed, human-labeled column set of the exported sheet.
const HEADERS: &[&str] = &[
    "ID",
    "Área",
    "Tipo de Equipo",
    "Nombre PC",
    "Marca",
    "Modelo",
    "Serie",
    "Fecha Mantenimiento",
    "Tipo Mantenimiento",
    "Estado Equipo",
    "Observaciones",
    "Técnico Responsable",
    "Creado por",
    "Fecha Creación",
];

#[derive(OpenApi)]
#[openapi(paths(export_excel_handler))]
/// Defines the OpenAPI spec for the export endpoint
pub struct ExportApi;

/// Used to group the export endpoint in the OpenAPI documentation
pub const EXPORT_API_GROUP: &str = "EXPORT";

/// Builds a router for the export route
pub fn export_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/excel", post(export_excel_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
}

/// Spreadsheet export handler function
#[utoipa::path(
    post,
    path = "/api/export/excel",
    tag = EXPORT_API_GROUP,
    request_body = EquipmentFilter,
    security(
        ("bearerAuth" = [])
    ),
    responses(
        (status = 200, description = "Excel workbook of matching records", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    )
)]
pub async fn export_excel_handler(
    State(state): State<Arc<AppState>>,
    Json(filters): Json<EquipmentFilter>,
) -> Result<impl IntoResponse, Error> {
    let records = state
        .db
        .filter_equipment(&filters, 0, state.config.export_row_limit)
        .await?;

    let buffer = build_workbook(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        buffer,
    ))
}

/// Render records into a single-sheet workbook, one row per record under the
/// fixed header row.
fn build_workbook(records: &[Equipment]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, label) in HEADERS.iter().enumerate() {
        worksheet.write(0, col as u16, *label)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, value) in row_values(record).iter().enumerate() {
            worksheet.write(row as u32 + 1, col as u16, value.as_str())?;
        }
    }

    workbook.save_to_buffer()
}

/// Project one record into the export's column order.
fn row_values(record: &Equipment) -> [String; 14] {
    [
        record.id.to_string(),
        record.area.clone(),
        record.equipment_type.clone(),
        record.nombre_pc.clone().unwrap_or_default(),
        record.marca.clone(),
        record.modelo.clone(),
        record.serie.clone(),
        record.fecha.format("%Y-%m-%d").to_string(),
        record.tipo_mantenimiento.clone(),
        record.estado_equipo.clone(),
        record.observaciones.clone(),
        record.tecnico_responsable.clone(),
        record.created_by.clone(),
        record.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample() -> Equipment {
        Equipment {
            id: Uuid::nil(),
            area: "Lab".to_string(),
            equipment_type: "cpu".to_string(),
            nombre_pc: None,
            marca: "Dell".to_string(),
            modelo: "OptiPlex".to_string(),
            serie: "SN-1".to_string(),
            fecha: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            tipo_mantenimiento: "preventivo".to_string(),
            observaciones: "ok".to_string(),
            tecnico_responsable: "Alice Example".to_string(),
            estado_equipo: "operativo".to_string(),
            created_by: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 6, 9, 15, 30).unwrap(),
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn header_labels_match_export_contract() {
        assert_eq!(
            HEADERS,
            &[
                "ID",
                "Área",
                "Tipo de Equipo",
                "Nombre PC",
                "Marca",
                "Modelo",
                "Serie",
                "Fecha Mantenimiento",
                "Tipo Mantenimiento",
                "Estado Equipo",
                "Observaciones",
                "Técnico Responsable",
                "Creado por",
                "Fecha Creación",
            ]
        );
    }

    #[test]
    fn row_values_align_with_headers() {
        let values = row_values(&sample());
        assert_eq!(values.len(), HEADERS.len());
        assert_eq!(values[1], "Lab");
        assert_eq!(values[4], "Dell");
        // Missing machine name exports as an empty cell, not "null".
        assert_eq!(values[3], "");
    }

    #[test]
    fn dates_use_the_fixed_formats() {
        let values = row_values(&sample());
        assert_eq!(values[7], "2024-03-05");
        assert_eq!(values[13], "2024-03-06 09:15:30");
    }

    #[test]
    fn workbook_builds_for_empty_and_nonempty_sets() {
        assert!(!build_workbook(&[]).unwrap().is_empty());
        assert!(!build_workbook(&[sample()]).unwrap().is_empty());
    }
}
