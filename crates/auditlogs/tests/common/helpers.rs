// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Helper functions for integration tests

use auditlogs::model::{Actor, AuditLog, AuditLogEntry};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_CURSOR: AtomicUsize = AtomicUsize::new(1);

/// Midnight of a fixed day, so tests never straddle a real day boundary.
#[allow(dead_code)]
pub fn test_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap()
}

/// `num` entries one minute apart starting at `start`, with cursors that are
/// unique across the whole test binary.
#[allow(dead_code)]
pub fn create_test_audit_logs(num: usize, start: DateTime<Utc>) -> Vec<AuditLogEntry> {
    (0..num)
        .map(|i| {
            let n = NEXT_CURSOR.fetch_add(1, Ordering::Relaxed);
            AuditLogEntry {
                cursor: format!("cur-{n:08}"),
                audit_log: AuditLog {
                    id: format!("aud-{n}"),
                    timestamp: start + Duration::minutes(i as i64),
                    event: "LoginEvent".to_string(),
                    status: "success".to_string(),
                    actor: Actor {
                        kind: "user".to_string(),
                        email: "test@example.com".to_string(),
                        id: "user-1".to_string(),
                    },
                    metadata: BTreeMap::new(),
                },
            }
        })
        .collect()
}
