use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use super::AppState;
use super::handlers;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Health (public)
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        // Public config (public by design; data sits behind map-data)
        .route(
            "/api/config",
            get(handlers::config::get_config).fallback(handlers::method_not_allowed),
        )
        // Session
        .route(
            "/api/login",
            post(handlers::auth::login).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/logout",
            post(handlers::auth::logout).fallback(handlers::method_not_allowed),
        )
        // Map pins (session cookie required)
        .route(
            "/api/map-data",
            get(handlers::map_data::get_map_data).fallback(handlers::method_not_allowed),
        )
        // Inspection submission
        .route(
            "/api/submit",
            post(handlers::submit::submit).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
        // Frontend static files + SPA fallback (must come after with_state)
        .fallback_service(
            ServeDir::new("public")
                .fallback(ServeFile::new("public/index.html"))
        )
}
