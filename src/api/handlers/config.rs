use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use crate::api::AppState;

/// The Maps key is intentionally public; access control is enforced by the
/// map-data endpoint plus the passcode cookie, not by hiding this key.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "googleMapsKey": state.maps_api_key,
    }))
}
