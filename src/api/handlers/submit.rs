use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::notion::props;

/// Defect option that flags equipment as unusable. The flag is returned to
/// the caller for client-side alerting; this service sends no alerts itself.
const DO_NOT_OPERATE: &str = "Yes. DO NOT OPERATE.";
/// Record title when the manager comment is blank.
const DEFAULT_TITLE: &str = "New submission";

/// Raw submission payload as sent by the inspection form. Numeric-or-empty
/// fields stay `Value` until coercion so "", null, absent, numbers and
/// numeric strings can all be told apart.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SubmitRequest {
    employee_name: String,
    project: String,
    equipment: String,
    hour_meter: Value,
    manager_comment: String,
    location_text: String,
    describe_location: String,
    defects_found: Vec<String>,
    describe_equipment: String,
    describe_defect: String,
    gps_lat: Value,
    gps_lon: Value,
    gps_acc: Value,
}

/// A validated submission, ready to map onto the remote record schema.
#[derive(Debug)]
struct Submission {
    employee_name: String,
    project: String,
    equipment: String,
    hour_meter: Option<f64>,
    manager_comment: String,
    location_text: String,
    describe_location: String,
    defects_found: Vec<String>,
    describe_equipment: String,
    describe_defect: String,
    gps_lat: Option<f64>,
    gps_lon: Option<f64>,
    gps_acc: Option<f64>,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<Json<Value>> {
    if !state.notion_configured() {
        return Err(AppError::Config(
            "Missing Notion token or database id".to_string(),
        ));
    }

    let body = decode_body(&body)?;
    let submission = Submission::parse(body)?;

    let payload = json!({
        "parent": { "database_id": state.database_id },
        "properties": submission.to_properties(),
    });

    let data = state.notion.create_page(payload).await?;

    let id = data.get("id").and_then(Value::as_str).unwrap_or_default();
    let do_not_operate = submission.do_not_operate();
    if do_not_operate {
        tracing::warn!("Submission {} flagged DO NOT OPERATE", id);
    }

    Ok(Json(json!({
        "ok": true,
        "id": id,
        "doNotOperate": do_not_operate,
    })))
}

/// The form may send the payload pre-serialized (a JSON string containing
/// JSON). The body is taken as raw bytes so a decode failure surfaces as an
/// internal error in the standard `{ok, error}` shape, never as an extractor
/// rejection. An empty body reads as an empty object and falls out at
/// validation.
fn decode_body(body: &[u8]) -> Result<Value, AppError> {
    if body.is_empty() {
        return Ok(json!({}));
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::Internal(e.to_string()))?;
    match value {
        Value::String(s) => {
            serde_json::from_str(&s).map_err(|e| AppError::Internal(e.to_string()))
        }
        other => Ok(other),
    }
}

/// Coerce a numeric-or-empty form field. Absent/null/"" mean null; numbers
/// and numeric strings parse; anything else is rejected rather than being
/// forwarded as NaN.
fn numeric_or_null(value: &Value, field: &str) -> Result<Option<f64>, AppError> {
    let reject = || AppError::Validation(format!("Field '{field}' must be a number"));

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Some(n.as_f64().ok_or_else(reject)?)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(reject()),
            }
        }
        _ => Err(reject()),
    }
}

impl Submission {
    fn parse(body: Value) -> Result<Self, AppError> {
        let req: SubmitRequest =
            serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;

        let employee_name = req.employee_name.trim().to_string();
        let project = req.project.trim().to_string();
        let equipment = req.equipment.trim().to_string();

        let mut missing = Vec::new();
        if employee_name.is_empty() {
            missing.push("Employee Name");
        }
        if project.is_empty() {
            missing.push("Project");
        }
        if equipment.is_empty() {
            missing.push("Equipment");
        }
        if req.defects_found.is_empty() {
            missing.push("Defects Found?");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            employee_name,
            project,
            equipment,
            hour_meter: numeric_or_null(&req.hour_meter, "hourMeter")?,
            manager_comment: req.manager_comment.trim().to_string(),
            location_text: req.location_text.trim().to_string(),
            describe_location: req.describe_location.trim().to_string(),
            defects_found: req.defects_found,
            describe_equipment: req.describe_equipment.trim().to_string(),
            describe_defect: req.describe_defect.trim().to_string(),
            gps_lat: numeric_or_null(&req.gps_lat, "gpsLat")?,
            gps_lon: numeric_or_null(&req.gps_lon, "gpsLon")?,
            gps_acc: numeric_or_null(&req.gps_acc, "gpsAcc")?,
        })
    }

    /// Property names must match the remote database schema exactly.
    fn to_properties(&self) -> Value {
        let title = if self.manager_comment.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.manager_comment
        };

        json!({
            "Manager Comment": props::title(title),
            "Employee Name": props::rich_text(&self.employee_name),
            "Project": props::select(&self.project),
            "Equipment": props::select(&self.equipment),
            "Hour Meter": props::number_value(self.hour_meter),
            "GPS Lat": props::number_value(self.gps_lat),
            "GPS Lon": props::number_value(self.gps_lon),
            "GPS Accuracy (m)": props::number_value(self.gps_acc),
            "Location": props::rich_text(&self.location_text),
            "Describe Location": props::rich_text(&self.describe_location),
            "Defects Found?": props::multi_select(&self.defects_found),
            "Describe Equipment": props::rich_text(&self.describe_equipment),
            "Describe Defect": props::rich_text(&self.describe_defect),
        })
    }

    fn do_not_operate(&self) -> bool {
        self.defects_found.iter().any(|d| d == DO_NOT_OPERATE)
    }
}
