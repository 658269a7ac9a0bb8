// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::category::LogCategory;
use crate::error::ConfigError;
use crate::pool::{HarvestTarget, DEFAULT_MAX_CONCURRENCY};
use crate::s3::Encryption;
use crate::source::DEFAULT_API_BASE_URL;

pub const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn is_valid_log_level(level: &str) -> bool {
    VALID_LOG_LEVELS.contains(&level)
}

/// What happened to the `.env` file. Returned rather than logged because it is
/// loaded before the subscriber exists.
#[derive(Debug, PartialEq, Eq)]
pub enum EnvFile {
    /// `LOCAL=false`
    Skipped,
    Loaded(PathBuf),
    NotLoaded(String),
}

/// Destination bucket settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Override for S3 compatible stores
    pub endpoint_url: Option<String>,
    pub encryption: Encryption,
}

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub workspace_ids: Vec<String>,
    pub organization_id: Option<String>,
    pub s3: S3Config,
    pub render_api_key: String,
    pub render_api_base_url: String,
    /// Number of identities harvested at the same time
    pub max_concurrency: usize,
    pub log_level: String,
}

impl Config {
    /// Loads `.env` from the working directory unless `LOCAL=false`. A missing
    /// file is not an error.
    pub fn load_env_file() -> EnvFile {
        if env::var("LOCAL").is_ok_and(|val| val == "false") {
            return EnvFile::Skipped;
        }
        match dotenv::dotenv() {
            Ok(path) => EnvFile::Loaded(path),
            Err(e) => EnvFile::NotLoaded(e.to_string()),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let workspace_ids = parse_id_list(&required("WORKSPACE_IDS")?);
        let organization_id = optional("ORGANIZATION_ID");

        let encryption = if flag("S3_USE_KMS") {
            Encryption::Kms {
                key_id: optional("S3_KMS_KEY_ID"),
                bucket_key_enabled: flag("S3_BUCKET_KEY_ENABLED"),
            }
        } else if flag("S3_DISABLE_SSE") {
            Encryption::None
        } else {
            Encryption::S3Managed
        };

        let s3 = S3Config {
            bucket: required("S3_BUCKET")?,
            region: required("AWS_REGION")?,
            endpoint_url: optional("S3_ENDPOINT_URL"),
            encryption,
        };

        let max_concurrency = match optional("MAX_CONCURRENCY") {
            Some(val) => val.parse::<usize>().map_err(|_| {
                ConfigError::Invalid(format!("MAX_CONCURRENCY must be a number, got '{val}'"))
            })?,
            None => DEFAULT_MAX_CONCURRENCY,
        };

        let config = Config {
            workspace_ids,
            organization_id,
            s3,
            render_api_key: required("RENDER_API_KEY")?,
            render_api_base_url: optional("RENDER_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            max_concurrency,
            log_level: env::var("LOG_LEVEL")
                .map(|val| val.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace_ids.is_empty() {
            return Err(ConfigError::Invalid(
                "WORKSPACE_IDS must name at least one workspace".to_string(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "MAX_CONCURRENCY must be greater than 0".to_string(),
            ));
        }

        if !is_valid_log_level(&self.log_level) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Every workspace, then the organization if one is configured.
    pub fn targets(&self) -> Vec<HarvestTarget> {
        let mut targets: Vec<HarvestTarget> = self
            .workspace_ids
            .iter()
            .map(|id| HarvestTarget::new(LogCategory::Workspace, id))
            .collect();
        if let Some(id) = &self.organization_id {
            targets.push(HarvestTarget::new(LogCategory::Organization, id));
        }
        targets
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workspace_ids", &self.workspace_ids)
            .field("organization_id", &self.organization_id)
            .field("s3", &self.s3)
            .field("render_api_key", &"<redacted>")
            .field("render_api_base_url", &self.render_api_base_url)
            .field("max_concurrency", &self.max_concurrency)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn flag(name: &str) -> bool {
    optional(name).is_some_and(|val| matches!(val.to_lowercase().as_str(), "true" | "1" | "yes"))
}

fn parse_id_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}
