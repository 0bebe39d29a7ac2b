use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::equipment::{EQUIPMENT_STATES, EQUIPMENT_TYPES, MAINTENANCE_TYPES};

fn check_member(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        ))
    }
}

/// Creation payload. `created_by`/`tecnico_responsable` are intentionally
/// absent: the server derives them from the authenticated caller and any
/// such keys in the request body are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EquipmentCreate {
    pub area: String,
    pub equipment_type: String,
    pub nombre_pc: Option<String>,
    pub marca: String,
    pub modelo: String,
    pub serie: String,
    pub fecha: DateTime<Utc>,
    pub tipo_mantenimiento: String,
    pub observaciones: String,
    #[serde(default = "default_estado")]
    pub estado_equipo: String,
}

fn default_estado() -> String {
    crate::models::equipment::DEFAULT_ESTADO.to_string()
}

impl EquipmentCreate {
    pub fn validate(&self) -> Result<(), String> {
        check_member("equipment_type", &self.equipment_type, EQUIPMENT_TYPES)?;
        check_member(
            "tipo_mantenimiento",
            &self.tipo_mantenimiento,
            MAINTENANCE_TYPES,
        )?;
        check_member("estado_equipo", &self.estado_equipo, EQUIPMENT_STATES)?;
        Ok(())
    }
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EquipmentUpdate {
    pub area: Option<String>,
    pub nombre_pc: Option<String>,
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub serie: Option<String>,
    pub fecha: Option<DateTime<Utc>>,
    pub tipo_mantenimiento: Option<String>,
    pub observaciones: Option<String>,
    pub estado_equipo: Option<String>,
}

impl EquipmentUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref tipo) = self.tipo_mantenimiento {
            check_member("tipo_mantenimiento", tipo, MAINTENANCE_TYPES)?;
        }
        if let Some(ref estado) = self.estado_equipo {
            check_member("estado_equipo", estado, EQUIPMENT_STATES)?;
        }
        Ok(())
    }
}

/// Structured filter; every field optional, absent fields unconstrained.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EquipmentFilter {
    pub equipment_type: Option<String>,
    pub area: Option<String>,
    pub tipo_mantenimiento: Option<String>,
    pub estado_equipo: Option<String>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_unknown_equipment_type() {
        let payload = EquipmentCreate {
            area: "Lab".to_string(),
            equipment_type: "toaster".to_string(),
            nombre_pc: None,
            marca: "Dell".to_string(),
            modelo: "X".to_string(),
            serie: "S".to_string(),
            fecha: Utc::now(),
            tipo_mantenimiento: "preventivo".to_string(),
            observaciones: String::new(),
            estado_equipo: "operativo".to_string(),
        };
        let err = payload.validate().unwrap_err();
        assert!(err.contains("equipment_type"));
    }

    #[test]
    fn create_defaults_estado_when_body_omits_it() {
        let payload: EquipmentCreate = serde_json::from_value(serde_json::json!({
            "area": "Lab",
            "equipment_type": "cpu",
            "marca": "Dell",
            "modelo": "X",
            "serie": "S",
            "fecha": "2024-03-01T00:00:00Z",
            "tipo_mantenimiento": "preventivo",
            "observaciones": ""
        }))
        .unwrap();
        assert_eq!(payload.estado_equipo, "operativo");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_accepts_absent_fields() {
        assert!(EquipmentUpdate::default().validate().is_ok());
    }

    #[test]
    fn update_rejects_unknown_estado() {
        let update = EquipmentUpdate {
            estado_equipo: Some("roto".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
