//! Normalizes raw `pangolins` rows into [`IncidentRecord`]s.

use gppg_incident_models::{IncidentCategory, IncidentRecord};
use serde::Deserialize;

use crate::parsing::parse_timestamp;

/// Columns requested from the backend, in `PostgREST` `select` syntax.
pub const SELECT_COLUMNS: &str = "id,tag_id,municipality,status,found_at,created_at";

/// Raw row from the `pangolins` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PangolinRow {
    /// Primary key; numeric or UUID depending on the schema revision.
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub tag_id: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub found_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Normalizes a batch of rows, skipping the ones that can't be mapped.
#[must_use]
pub fn normalize_rows(rows: Vec<PangolinRow>) -> Vec<IncidentRecord> {
    let raw_count = rows.len();
    let records: Vec<IncidentRecord> = rows.into_iter().filter_map(normalize_row).collect();

    log::info!(
        "Normalized {} incidents from {} raw rows",
        records.len(),
        raw_count
    );

    records
}

/// Normalizes a single row.
///
/// Returns `None` if the status is not a known category or the row has no
/// usable timestamp at all.
#[must_use]
pub fn normalize_row(row: PangolinRow) -> Option<IncidentRecord> {
    let id = match row.id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    };

    let status = row.status.as_deref().map(str::trim).unwrap_or_default();
    let category = match status.to_lowercase().parse::<IncidentCategory>() {
        Ok(category) => category,
        Err(_) => {
            log::warn!("Skipping pangolin row {id}: unknown status '{status}'");
            return None;
        }
    };

    let found_at = row.found_at.as_deref().and_then(parse_timestamp);
    let created_at = row.created_at.as_deref().and_then(parse_timestamp);

    let Some(created_at) = created_at.or(found_at) else {
        log::warn!("Skipping pangolin row {id}: no parseable timestamp");
        return None;
    };

    Some(IncidentRecord {
        id,
        tag_id: row.tag_id.filter(|t| !t.trim().is_empty()),
        region_name: row
            .municipality
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        category,
        found_at,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<PangolinRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normalizes_complete_row() {
        let records = normalize_rows(rows(
            r#"[{
                "id": 42,
                "tag_id": "PPC-001",
                "municipality": "Puerto Princesa",
                "status": "illegal_trade",
                "found_at": "2025-03-01T08:00:00+00:00",
                "created_at": "2025-03-02T09:00:00+00:00"
            }]"#,
        ));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "42");
        assert_eq!(record.tag_id.as_deref(), Some("PPC-001"));
        assert_eq!(record.region(), Some("Puerto Princesa"));
        assert_eq!(record.category, IncidentCategory::IllegalTrade);
        assert_eq!(record.occurred_at().to_string(), "2025-03-01 08:00:00 UTC");
    }

    #[test]
    fn missing_found_at_falls_back_to_created_at() {
        let records = normalize_rows(rows(
            r#"[{
                "id": "7b8f3c2e-0000-4000-8000-000000000000",
                "municipality": "Taytay",
                "status": "alive",
                "found_at": null,
                "created_at": "2025-03-02T09:00:00+00:00"
            }]"#,
        ));

        assert_eq!(records[0].id, "7b8f3c2e-0000-4000-8000-000000000000");
        assert!(records[0].found_at.is_none());
        assert_eq!(
            records[0].occurred_at().to_string(),
            "2025-03-02 09:00:00 UTC"
        );
    }

    #[test]
    fn blank_municipality_becomes_none() {
        let records = normalize_rows(rows(
            r#"[{ "id": 1, "municipality": "  ", "status": "dead", "created_at": "2025-03-02" }]"#,
        ));
        assert_eq!(records[0].region_name, None);
    }

    #[test]
    fn status_is_case_insensitive() {
        let records = normalize_rows(rows(
            r#"[{ "id": 1, "status": " Poaching ", "created_at": "2025-03-02" }]"#,
        ));
        assert_eq!(records[0].category, IncidentCategory::Poaching);
    }

    #[test]
    fn skips_unknown_status_and_missing_timestamps() {
        let records = normalize_rows(rows(
            r#"[
                { "id": 1, "status": "scales", "created_at": "2025-03-02" },
                { "id": 2, "status": null, "created_at": "2025-03-02" },
                { "id": 3, "status": "alive" },
                { "id": 4, "status": "alive", "found_at": "2025-01-01" }
            ]"#,
        ));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "4");
        assert_eq!(records[0].created_at, records[0].found_at.unwrap());
    }
}
