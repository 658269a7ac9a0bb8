// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::LogCategory;
use crate::error::StoreError;

const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Resume position persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub last_cursor: String,
    pub last_timestamp: DateTime<Utc>,
}

impl Checkpoint {
    pub fn to_json(&self) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(self).map_err(StoreError::Encode)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, StoreError> {
        serde_json::from_slice(data).map_err(StoreError::Decode)
    }
}

pub fn checkpoint_key(category: LogCategory, id: &str) -> String {
    format!("{}/{CHECKPOINT_FILE}", category.partition_prefix(id))
}

#[async_trait]
pub trait CheckpointStore {
    /// Returns `Ok(None)` when no checkpoint was ever saved for this identity.
    async fn load(&self, category: LogCategory, id: &str)
        -> Result<Option<Checkpoint>, StoreError>;

    async fn save(
        &self,
        category: LogCategory,
        id: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_checkpoint_key() {
        assert_eq!(
            checkpoint_key(LogCategory::Workspace, "tea-1"),
            "workspace=tea-1/checkpoint.json"
        );
        assert_eq!(
            checkpoint_key(LogCategory::Organization, "org-1"),
            "organization=org-1/checkpoint.json"
        );
    }

    #[test]
    fn test_checkpoint_json_shape() {
        let cp = Checkpoint {
            last_cursor: "cursor-123".to_string(),
            last_timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap(),
        };

        let data = cp.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(value["lastCursor"], "cursor-123");
        assert_eq!(value["lastTimestamp"], "2024-01-15T10:30:45Z");
        assert_eq!(Checkpoint::from_json(&data).unwrap(), cp);
    }

    #[test]
    fn test_invalid_checkpoint_json() {
        let err = Checkpoint::from_json(b"{\"lastCursor\": 5}").unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
