// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Failure listing audit logs from the API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("error making request: {0}")]
    Request(reqwest::Error),

    #[error("API request failed with status: {0}")]
    Status(StatusCode),

    #[error("error parsing JSON response: {0}")]
    Decode(serde_json::Error),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Request(err)
    }
}

/// Failure reading or writing a checkpoint.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("error reading checkpoint: {0}")]
    Read(String),

    #[error("error writing checkpoint: {0}")]
    Write(String),

    #[error("error unmarshaling checkpoint: {0}")]
    Decode(serde_json::Error),

    #[error("error marshaling checkpoint: {0}")]
    Encode(serde_json::Error),
}

/// Failure encoding or uploading a batch.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("error encoding batch: {0}")]
    Encode(String),

    #[error("error uploading batch: {0}")]
    Upload(String),
}

/// Outcome of a failed harvest run for one identity. No variant leaves a
/// checkpoint behind that covers unfinished work.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("error fetching audit logs: {0}")]
    SourceFetch(SourceError),

    #[error("error uploading audit logs: {0}")]
    SinkUpload(SinkError),

    #[error("error loading checkpoint: {0}")]
    CheckpointLoad(StoreError),

    #[error("error saving checkpoint: {0}")]
    CheckpointSave(StoreError),

    #[error("run cancelled")]
    Cancelled,

    #[error("harvest task failed: {0}")]
    Task(String),
}

/// Invalid or missing process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
