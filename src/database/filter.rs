//! Translates an [`EquipmentFilter`] into SQL predicates.
//!
//! Used by the filtered listing and the spreadsheet export, which must agree
//! on filter semantics.

use sqlx::{Postgres, QueryBuilder};

use crate::models::dto::EquipmentFilter;

/// Columns searched by the free-text `search` filter.
const SEARCH_COLUMNS: &[&str] = &["marca", "modelo", "serie", "observaciones"];

/// Append one ` AND …` predicate per present filter field to a builder whose
/// SQL already ends in a WHERE clause (callers start from `WHERE 1=1`).
///
/// Semantics: exact match on the three enum-valued columns, case-insensitive
/// substring on `area`, inclusive range on `fecha` only when BOTH endpoints
/// are given (a single endpoint applies no date constraint at all, a quirk
/// inherited from the filter's first implementation and kept deliberately),
/// and a case-insensitive substring OR across marca/modelo/serie/observaciones
/// for `search`.
pub fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &EquipmentFilter) {
    if let Some(ref equipment_type) = filters.equipment_type {
        qb.push(" AND equipment_type = ");
        qb.push_bind(equipment_type.clone());
    }
    if let Some(ref area) = filters.area {
        qb.push(" AND area ILIKE ");
        qb.push_bind(contains_pattern(area));
    }
    if let Some(ref tipo) = filters.tipo_mantenimiento {
        qb.push(" AND tipo_mantenimiento = ");
        qb.push_bind(tipo.clone());
    }
    if let Some(ref estado) = filters.estado_equipo {
        qb.push(" AND estado_equipo = ");
        qb.push_bind(estado.clone());
    }
    if let (Some(inicio), Some(fin)) = (filters.fecha_inicio, filters.fecha_fin) {
        qb.push(" AND fecha >= ");
        qb.push_bind(inicio);
        qb.push(" AND fecha <= ");
        qb.push_bind(fin);
    }
    if let Some(ref search) = filters.search {
        let pattern = contains_pattern(search);
        qb.push(" AND (");
        for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column);
            qb.push(" ILIKE ");
            qb.push_bind(pattern.clone());
        }
        qb.push(")");
    }
}

/// Wrap user input for an ILIKE containment match. LIKE metacharacters in
/// the needle are escaped so `%` and `_` match themselves.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn build(filters: &EquipmentFilter) -> String {
        let mut qb = QueryBuilder::new("SELECT * FROM equipment WHERE 1=1");
        push_filters(&mut qb, filters);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filter_adds_no_predicates() {
        let sql = build(&EquipmentFilter::default());
        assert_eq!(sql, "SELECT * FROM equipment WHERE 1=1");
    }

    #[test]
    fn exact_match_fields_use_equality() {
        let sql = build(&EquipmentFilter {
            estado_equipo: Some("operativo".to_string()),
            ..Default::default()
        });
        assert!(sql.contains("estado_equipo = $1"));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn area_uses_case_insensitive_substring() {
        let sql = build(&EquipmentFilter {
            area: Some("lab".to_string()),
            ..Default::default()
        });
        assert!(sql.contains("area ILIKE $1"));
    }

    #[test]
    fn search_ors_across_all_four_columns() {
        let sql = build(&EquipmentFilter {
            search: Some("Dell".to_string()),
            ..Default::default()
        });
        assert!(sql.contains(
            "(marca ILIKE $1 OR modelo ILIKE $2 OR serie ILIKE $3 OR observaciones ILIKE $4)"
        ));
    }

    #[test]
    fn date_range_requires_both_endpoints() {
        let inicio = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let fin = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();

        let both = build(&EquipmentFilter {
            fecha_inicio: Some(inicio),
            fecha_fin: Some(fin),
            ..Default::default()
        });
        assert!(both.contains("fecha >= $1"));
        assert!(both.contains("fecha <= $2"));

        // Only one endpoint set: no date constraint whatsoever.
        let only_start = build(&EquipmentFilter {
            fecha_inicio: Some(inicio),
            ..Default::default()
        });
        assert!(!only_start.contains("fecha"));

        let only_end = build(&EquipmentFilter {
            fecha_fin: Some(fin),
            ..Default::default()
        });
        assert!(!only_end.contains("fecha"));
    }

    #[test]
    fn like_wildcards_in_input_match_literally() {
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("PC_01"), "%PC\\_01%");
        assert_eq!(contains_pattern(r"a\b"), "%a\\\\b%");
        assert_eq!(contains_pattern("Dell"), "%Dell%");
    }

    #[test]
    fn predicates_combine_with_and() {
        let sql = build(&EquipmentFilter {
            equipment_type: Some("cpu".to_string()),
            area: Some("Lab".to_string()),
            search: Some("Dell".to_string()),
            ..Default::default()
        });
        assert!(sql.contains("equipment_type = $1"));
        assert!(sql.contains("area ILIKE $2"));
        assert!(sql.contains("marca ILIKE $3"));
    }
}
