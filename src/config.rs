use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub notion: NotionConfig,
    pub maps: MapsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Allowed CORS origins. Defaults to localhost dev ports.
    /// Set EQUIP__API__CORS_ALLOWED_ORIGINS in production.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared 4-digit passcode gating the map view. Empty means login
    /// is unconfigured and returns an error until it is set.
    #[serde(default)]
    pub passcode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotionConfig {
    /// Integration token (bearer auth against the Notion API).
    #[serde(default)]
    pub token: String,
    /// Database holding inspection records and GPS pins.
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_notion_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapsConfig {
    /// Google Maps browser key. Intentionally public; the sensitive data
    /// sits behind the map-data endpoint, not behind this key.
    #[serde(default)]
    pub api_key: String,
}

fn default_bind() -> String { "0.0.0.0".to_string() }
fn default_api_port() -> u16 { 8080 }
fn default_notion_base_url() -> String { "https://api.notion.com".to_string() }
fn default_cors_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:8080".to_string(),
    ]
}

pub fn load() -> Result<Config> {
    let cfg: Config = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("EQUIP").separator("__"))
        .set_default("api.bind", "0.0.0.0")?
        .set_default("api.port", 8080)?
        .set_default("auth.passcode", "")?
        .set_default("notion.token", "")?
        .set_default("notion.database_id", "")?
        .set_default("notion.base_url", "https://api.notion.com")?
        .set_default("maps.api_key", "")?
        .build()?
        .try_deserialize()?;

    // Missing secrets are not fatal at startup: the affected endpoints
    // report a config error per request, everything else keeps working.
    if cfg.auth.passcode.trim().is_empty() {
        tracing::warn!("EQUIP__AUTH__PASSCODE not set; login will be rejected");
    }
    if cfg.notion.token.is_empty() || cfg.notion.database_id.is_empty() {
        tracing::warn!("Notion token/database id not set; map-data and submit will fail");
    }

    Ok(cfg)
}
