//! Thin client for the Notion API.
//!
//! Covers the two calls this service needs: query a database and create a
//! page. Responses come back as raw JSON property bags; `props` has the
//! helpers for reading and building typed property values.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::AppError;

pub mod props;

/// Versioned request header required by the Notion API.
const NOTION_VERSION: &str = "2022-06-28";
/// HTTP client timeout for upstream calls
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("equip-prestart/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }

    /// Query a database: filters/sorts in, up to one page of records out.
    pub async fn query_database(&self, database_id: &str, payload: Value) -> Result<Value, AppError> {
        self.post_json(&format!("/v1/databases/{database_id}/query"), payload)
            .await
    }

    /// Create one record in a database.
    pub async fn create_page(&self, payload: Value) -> Result<Value, AppError> {
        self.post_json("/v1/pages", payload).await
    }

    async fn post_json(&self, path: &str, payload: Value) -> Result<Value, AppError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("Notion call {} failed: HTTP {}", path, status);
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
