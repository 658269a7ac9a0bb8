// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Wire types returned by the audit log API.
//!
//! The same shape is written back out when a batch is uploaded, so consumers of
//! the stored batches see exactly what the API returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event: String,
    pub status: String,
    pub actor: Actor,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub metadata: BTreeMap<String, String>,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One page item: an audit log paired with the opaque cursor that resumes the
/// stream right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub cursor: String,
    pub audit_log: AuditLog,
}

impl AuditLogEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.audit_log.timestamp
    }
}
