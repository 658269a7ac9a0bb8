// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Splits one page of audit logs into day windows.
//!
//! The anchor starts at UTC midnight of the first entry and moves forward by a
//! fixed 24h step each time an entry lands strictly after `anchor + 24h`. It is
//! not realigned to the triggering entry's own day, so after a gap of several
//! days the anchor lags behind and entries past the gap are split one per
//! window until it catches up. The anchor is recomputed for every page.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::model::AuditLogEntry;

fn start_of_day(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Returns the day windows of `entries` as contiguous sub-slices, in order.
/// Every window is non-empty and together they cover the page exactly once.
pub fn partition_by_day(entries: &[AuditLogEntry]) -> Vec<&[AuditLogEntry]> {
    let Some(first) = entries.first() else {
        return Vec::new();
    };

    let day = Duration::days(1);
    let mut anchor = start_of_day(first.timestamp());
    let mut window_start = 0;
    let mut windows = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if entry.timestamp() > anchor + day {
            windows.push(&entries[window_start..i]);
            window_start = i;
            anchor += day;
        }
    }

    if window_start < entries.len() {
        windows.push(&entries[window_start..]);
    }

    windows
}
