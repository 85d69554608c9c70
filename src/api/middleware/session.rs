use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use std::collections::HashMap;
use std::sync::Arc;
use crate::api::AppState;
use crate::error::AppError;

/// Cookie marking a session as passcode-validated.
pub const SESSION_COOKIE: &str = "equip_map_auth";
/// Cookie value while authenticated.
pub const SESSION_AUTHED: &str = "1";
/// Session window: 8 hours.
pub const SESSION_MAX_AGE_SECS: u64 = 8 * 60 * 60;

/// Build the Set-Cookie header value for the session marker.
/// The service runs behind HTTPS, so the cookie is marked Secure.
pub fn session_cookie(value: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Parse a Cookie header into a name -> value map.
/// Exact-key lookup avoids the substring/ordering pitfalls of scanning the
/// raw header. Later duplicates win, matching browser ordering semantics
/// closely enough for a single-cookie service.
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Axum extractor that requires a valid session cookie.
/// Add this as a handler parameter to gate an endpoint behind login;
/// rejection happens before the handler body runs, so no upstream call
/// is ever made for an unauthenticated request.
pub struct Session;

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let cookies = parse_cookies(header);
        match cookies.get(SESSION_COOKIE).map(String::as_str) {
            Some(SESSION_AUTHED) => Ok(Session),
            _ => Err(AppError::AuthFailed),
        }
    }
}
