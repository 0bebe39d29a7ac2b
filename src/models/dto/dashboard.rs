use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Equipment;

/// Counts keyed by the grouped field's literal stored value; values that
/// never occur simply have no key.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_equipments: i64,
    pub equipments_by_type: HashMap<String, i64>,
    pub equipments_by_status: HashMap<String, i64>,
    pub maintenance_by_type: HashMap<String, i64>,
    pub recent_maintenances: Vec<RecentMaintenance>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentMaintenance {
    pub id: Uuid,
    pub equipment_type: String,
    pub marca: String,
    pub modelo: String,
    pub tipo_mantenimiento: String,
    pub fecha: DateTime<Utc>,
    pub tecnico_responsable: String,
}

impl From<Equipment> for RecentMaintenance {
    fn from(record: Equipment) -> Self {
        Self {
            id: record.id,
            equipment_type: record.equipment_type,
            marca: record.marca,
            modelo: record.modelo,
            tipo_mantenimiento: record.tipo_mantenimiento,
            fecha: record.fecha,
            tecnico_responsable: record.tecnico_responsable,
        }
    }
}
