use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::dto::EquipmentUpdate;

pub const EQUIPMENT_TYPES: &[&str] = &["cpu", "monitor", "printer"];
pub const MAINTENANCE_TYPES: &[&str] = &["preventivo", "correctivo", "limpieza"];
pub const EQUIPMENT_STATES: &[&str] = &["operativo", "en_reparacion", "fuera_servicio"];

pub const DEFAULT_ESTADO: &str = "operativo";

/// One logged maintenance event against a physical asset.
///
/// `created_by` and `tecnico_responsable` are stamped server-side from the
/// authenticated caller and never taken from the request body. `updated_*`
/// stay null until an admin edits the record.
#[derive(Debug, Serialize, Clone, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    pub area: String,
    pub equipment_type: String,
    pub nombre_pc: Option<String>,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub fecha: DateTime<Utc>,
    pub tipo_mantenimiento: String,
    pub observaciones: String,
    pub tecnico_responsable: String,
    pub estado_equipo: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl Equipment {
    /// Merge a partial update into this record: only fields present in the
    /// payload change, everything else keeps its stored value. The caller
    /// stamps `updated_at`/`updated_by` regardless of which fields changed.
    pub fn apply_update(&mut self, update: EquipmentUpdate, updated_by: &str) {
        if let Some(area) = update.area {
            self.area = area;
        }
        if let Some(nombre_pc) = update.nombre_pc {
            self.nombre_pc = Some(nombre_pc);
        }
        if let Some(marca) = update.marca {
            self.marca = marca;
        }
        if let Some(modelo) = update.modelo {
            self.modelo = modelo;
        }
        if let Some(serie) = update.serie {
            self.serie = serie;
        }
        if let Some(fecha) = update.fecha {
            self.fecha = fecha;
        }
        if let Some(tipo_mantenimiento) = update.tipo_mantenimiento {
            self.tipo_mantenimiento = tipo_mantenimiento;
        }
        if let Some(observaciones) = update.observaciones {
            self.observaciones = observaciones;
        }
        if let Some(estado_equipo) = update.estado_equipo {
            self.estado_equipo = estado_equipo;
        }
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(updated_by.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Equipment {
        Equipment {
            id: Uuid::new_v4(),
            area: "Laboratorio".to_string(),
            equipment_type: "cpu".to_string(),
            nombre_pc: Some("PC-01".to_string()),
            marca: "Dell".to_string(),
            modelo: "OptiPlex 7080".to_string(),
            serie: "SN-1234".to_string(),
            fecha: Utc::now(),
            tipo_mantenimiento: "preventivo".to_string(),
            observaciones: "Limpieza general".to_string(),
            tecnico_responsable: "Alice Example".to_string(),
            estado_equipo: "operativo".to_string(),
            created_by: "alice".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn apply_update_changes_only_present_fields() {
        let mut record = sample();
        let update = EquipmentUpdate {
            estado_equipo: Some("en_reparacion".to_string()),
            ..Default::default()
        };
        record.apply_update(update, "admin");

        assert_eq!(record.estado_equipo, "en_reparacion");
        assert_eq!(record.area, "Laboratorio");
        assert_eq!(record.marca, "Dell");
        assert_eq!(record.created_by, "alice");
        assert_eq!(record.updated_by.as_deref(), Some("admin"));
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn apply_update_with_empty_payload_still_stamps_updater() {
        let mut record = sample();
        let before = record.clone();
        record.apply_update(EquipmentUpdate::default(), "admin");

        assert_eq!(record.area, before.area);
        assert_eq!(record.estado_equipo, before.estado_equipo);
        assert_eq!(record.updated_by.as_deref(), Some("admin"));
    }

    #[test]
    fn apply_update_never_touches_creator_fields() {
        let mut record = sample();
        record.apply_update(
            EquipmentUpdate {
                area: Some("Oficina".to_string()),
                ..Default::default()
            },
            "admin",
        );
        assert_eq!(record.created_by, "alice");
        assert_eq!(record.tecnico_responsable, "Alice Example");
    }
}
