use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::middleware::session::Session;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::notion::props;

/// Maximum records pulled per query; one page is plenty for a site map.
const PAGE_SIZE: u32 = 100;
/// Dedup key for pins whose equipment name is blank.
const UNKNOWN_EQUIPMENT: &str = "Unknown";

/// One equipment location surfaced to the map view.
#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    pub id: String,
    #[serde(rename = "createdTime")]
    pub created_time: Option<String>,
    pub equipment: String,
    pub project: String,
    pub lat: f64,
    pub lon: f64,
    pub acc: Option<f64>,
}

pub async fn get_map_data(
    State(state): State<Arc<AppState>>,
    _session: Session,
) -> AppResult<Json<Value>> {
    if !state.notion_configured() {
        return Err(AppError::Config(
            "Missing Notion token or database id".to_string(),
        ));
    }

    // Only records with both coordinates present, newest first. The
    // descending sort is what makes the first-seen-wins dedup below keep
    // the freshest pin per equipment.
    let query = json!({
        "page_size": PAGE_SIZE,
        "filter": {
            "and": [
                { "property": "GPS Lat", "number": { "is_not_empty": true } },
                { "property": "GPS Lon", "number": { "is_not_empty": true } }
            ]
        },
        "sorts": [
            { "property": "Created time", "direction": "descending" }
        ]
    });

    let data = state.notion.query_database(&state.database_id, query).await?;

    let pins = dedupe_latest(extract_pins(&data));

    Ok(Json(json!({
        "ok": true,
        "count": pins.len(),
        "pins": pins,
    })))
}

/// Map raw query results to pins, dropping any record that still lacks a
/// coordinate after extraction (the upstream filter should already have
/// excluded them, but the schema is not ours to trust).
fn extract_pins(data: &Value) -> Vec<Pin> {
    let empty = Vec::new();
    let results = data
        .get("results")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    results
        .iter()
        .filter_map(|page| {
            let props_bag = page.get("properties").cloned().unwrap_or(json!({}));

            let lat = props::number(&props_bag["GPS Lat"])?;
            let lon = props::number(&props_bag["GPS Lon"])?;

            let equipment_prop = &props_bag["Equipment"];
            let mut equipment = props::select_name(equipment_prop);
            if equipment.is_empty() {
                equipment = props::plain_text(equipment_prop);
            }

            Some(Pin {
                id: page
                    .get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                created_time: page
                    .get("created_time")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                equipment,
                project: props::select_name(&props_bag["Project"]),
                lat,
                lon,
                acc: props::number(&props_bag["GPS Accuracy (m)"]),
            })
        })
        .collect()
}

/// Keep only the first pin per equipment name. Input arrives sorted by
/// creation time descending, so first-seen is most recent.
fn dedupe_latest(pins: Vec<Pin>) -> Vec<Pin> {
    let mut seen = HashSet::new();
    pins.into_iter()
        .filter(|pin| {
            let key = match pin.equipment.trim() {
                "" => UNKNOWN_EQUIPMENT.to_string(),
                name => name.to_string(),
            };
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, created: &str, equipment: Value, lat: Value, lon: Value) -> Value {
        json!({
            "id": id,
            "created_time": created,
            "properties": {
                "Equipment": equipment,
                "Project": { "select": { "name": "North Pit" } },
                "GPS Lat": { "number": lat },
                "GPS Lon": { "number": lon },
                "GPS Accuracy (m)": { "number": 8.0 }
            }
        })
    }

    #[test]
    fn test_extract_pins_drops_missing_coordinates() {
        let data = json!({ "results": [
            page("a", "2026-08-01T00:00:00Z", json!({ "select": { "name": "Drill" } }), json!(-31.9), json!(115.8)),
            page("b", "2026-08-01T00:00:00Z", json!({ "select": { "name": "Loader" } }), json!(null), json!(115.8)),
            page("c", "2026-08-01T00:00:00Z", json!({ "select": { "name": "Grader" } }), json!(-31.9), json!(null)),
        ]});
        let pins = extract_pins(&data);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].id, "a");
        assert_eq!(pins[0].equipment, "Drill");
        assert_eq!(pins[0].project, "North Pit");
        assert_eq!(pins[0].acc, Some(8.0));
    }

    #[test]
    fn test_extract_pins_falls_back_to_free_text_equipment() {
        let data = json!({ "results": [
            page("a", "2026-08-01T00:00:00Z",
                 json!({ "rich_text": [{ "plain_text": "Backup genset" }] }),
                 json!(-31.9), json!(115.8)),
        ]});
        let pins = extract_pins(&data);
        assert_eq!(pins[0].equipment, "Backup genset");
    }

    #[test]
    fn test_extract_pins_tolerates_missing_results() {
        assert!(extract_pins(&json!({})).is_empty());
        assert!(extract_pins(&json!({ "results": [] })).is_empty());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_per_equipment() {
        let data = json!({ "results": [
            page("newest", "2026-08-02T00:00:00Z", json!({ "select": { "name": "Drill" } }), json!(-31.1), json!(115.1)),
            page("older", "2026-08-01T00:00:00Z", json!({ "select": { "name": "Drill" } }), json!(-31.2), json!(115.2)),
            page("other", "2026-08-01T00:00:00Z", json!({ "select": { "name": "Loader" } }), json!(-31.3), json!(115.3)),
        ]});
        let pins = dedupe_latest(extract_pins(&data));
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].id, "newest");
        assert_eq!(pins[1].id, "other");
    }

    #[test]
    fn test_dedupe_blank_equipment_collapses_to_unknown() {
        let data = json!({ "results": [
            page("a", "2026-08-02T00:00:00Z", json!({}), json!(-31.1), json!(115.1)),
            page("b", "2026-08-01T00:00:00Z", json!({ "select": { "name": "  " } }), json!(-31.2), json!(115.2)),
        ]});
        let pins = dedupe_latest(extract_pins(&data));
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].id, "a");
    }
}
