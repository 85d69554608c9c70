use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;

pub mod auth;
pub mod config;
pub mod map_data;
pub mod submit;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Catch-all for unsupported verbs on an API route, so even a 405 keeps
/// the standard `{ok:false, error}` body shape.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
