use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    AuthFailed,

    /// The remote API call itself failed. Status and body are forwarded
    /// verbatim; the body shape is owned by the third party, so it stays
    /// an opaque JSON value rather than a typed error.
    #[error("Upstream error (HTTP {status})")]
    Upstream { status: u16, body: Value },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;
        use serde_json::json;

        let (status, error) = match self {
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, json!("Method not allowed"))
            }
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!(msg)),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            AppError::AuthFailed => (StatusCode::UNAUTHORIZED, json!("Unauthorized")),
            AppError::Upstream { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!(msg)),
        };

        (status, Json(json!({ "ok": false, "error": error }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
