use axum::{body::Bytes, extract::State, http::header, response::IntoResponse, Json};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::sync::LazyLock;

use crate::api::middleware::session::{session_cookie, SESSION_AUTHED, SESSION_MAX_AGE_SECS};
use crate::api::AppState;
use crate::error::{AppError, AppResult};

static PASSCODE_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("Invalid regex"));

/// The passcode field may arrive as a JSON string or number; anything else
/// (or a missing/malformed body) reads as empty and fails the format check.
/// The body is taken as raw bytes so a decode failure lands here instead of
/// in an extractor rejection outside the `{ok, error}` shape.
fn extract_passcode(body: &[u8]) -> String {
    let body: Option<Value> = serde_json::from_slice(body).ok();
    match body.as_ref().and_then(|v| v.get("passcode")) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    if state.passcode.is_empty() {
        return Err(AppError::Config("Passcode not configured".to_string()));
    }

    let passcode = extract_passcode(&body);

    if !PASSCODE_FORMAT.is_match(&passcode) {
        return Err(AppError::Validation("Passcode must be 4 digits".to_string()));
    }

    // Plain string equality; timing-safe comparison is out of scope for a
    // shared 4-digit site passcode.
    if passcode != state.passcode {
        return Err(AppError::AuthFailed);
    }

    tracing::info!("Session issued");
    Ok((
        [(header::SET_COOKIE, session_cookie(SESSION_AUTHED, SESSION_MAX_AGE_SECS))],
        Json(json!({ "ok": true })),
    ))
}

/// Idempotent: always succeeds, always overwrites the cookie with an
/// immediately-expiring value.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, session_cookie("", 0))],
        Json(json!({ "ok": true })),
    )
}
