use anyhow::Result;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use std::sync::Arc;
use crate::config::Config;
use crate::notion::NotionClient;

pub mod router;
pub mod middleware;
pub mod handlers;

pub struct AppState {
    /// Shared 4-digit passcode expected by login (trimmed, may be empty).
    pub passcode: String,
    /// Public Google Maps browser key returned by /api/config.
    pub maps_api_key: String,
    /// Notion database holding inspection records.
    pub database_id: String,
    pub notion: NotionClient,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            passcode: cfg.auth.passcode.trim().to_string(),
            maps_api_key: cfg.maps.api_key.clone(),
            database_id: cfg.notion.database_id.clone(),
            notion: NotionClient::new(&cfg.notion.token, &cfg.notion.base_url)?,
        })
    }

    pub fn notion_configured(&self) -> bool {
        self.notion.is_configured() && !self.database_id.is_empty()
    }
}

pub async fn serve(cfg: Config) -> Result<()> {
    let bind_addr = format!("{}:{}", cfg.api.bind, cfg.api.port);
    let state = Arc::new(AppState::from_config(&cfg)?);
    let cors = build_cors_layer(&cfg.api.cors_allowed_origins);
    let app = build_app(state, cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("No valid CORS origins configured; CORS will block all cross-origin requests");
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn build_app(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .merge(router::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
