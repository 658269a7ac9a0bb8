// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use core::time::Duration;
use reqwest::{header, StatusCode};
use std::fmt;
use tracing::debug;

use crate::error::SourceError;
use crate::model::AuditLogEntry;

pub const DEFAULT_API_BASE_URL: &str = "https://api.render.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait AuditLogSource {
    /// Returns up to `limit` entries that come strictly after `cursor`, oldest
    /// first. An empty cursor starts from the beginning of the stream.
    async fn fetch(
        &self,
        endpoint: &str,
        cursor: &str,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, SourceError>;
}

/// Render API client for the audit log endpoints.
#[derive(Clone)]
pub struct RenderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RenderClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(RenderClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl fmt::Debug for RenderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuditLogSource for RenderClient {
    async fn fetch(
        &self,
        endpoint: &str,
        cursor: &str,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, SourceError> {
        let url = format!("{}{endpoint}", self.base_url);
        let limit = limit.to_string();

        debug!("Requesting audit logs from {url} after cursor {cursor:?}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("direction", "forward"),
                ("limit", limit.as_str()),
                ("cursor", cursor),
            ])
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(SourceError::Status(status));
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(SourceError::Decode)
    }
}
