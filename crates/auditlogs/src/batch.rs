// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Naming and encoding of uploaded day windows.
//!
//! A batch lands at
//! `{category}={id}/year={Y}/month={M}/day={D}/audit-logs-{YYYY-MM-DD_HH-MM-SS}.json.gz`
//! where the date parts come from the first entry of the window. Date folders
//! are not zero padded, the file name is.

use chrono::{DateTime, Datelike, Utc};
use flate2::{write::GzEncoder, Compression};
use std::io::Write;

use crate::category::LogCategory;
use crate::error::SinkError;
use crate::model::AuditLogEntry;

pub const BATCH_CONTENT_TYPE: &str = "application/gzip";

pub fn batch_path(category: LogCategory, id: &str, first_timestamp: DateTime<Utc>) -> String {
    format!(
        "{}/year={}/month={}/day={}/audit-logs-{}.json.gz",
        category.partition_prefix(id),
        first_timestamp.year(),
        first_timestamp.month(),
        first_timestamp.day(),
        first_timestamp.format("%Y-%m-%d_%H-%M-%S"),
    )
}

/// Serializes the window as one JSON array and gzips it.
pub fn encode_batch(entries: &[AuditLogEntry]) -> Result<Vec<u8>, SinkError> {
    let json = serde_json::to_vec(entries)
        .map_err(|e| SinkError::Encode(format!("error marshaling JSON: {e}")))?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| SinkError::Encode(format!("error compressing data: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SinkError::Encode(format!("error closing gzip writer: {e}")))
}
