// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

const AUDIT_LOGS_PATH: &str = "/audit-logs";

/// The kind of identity being harvested. It picks the API endpoint and is the
/// storage prefix for both batches and checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Workspace,
    Organization,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Workspace => "workspace",
            LogCategory::Organization => "organization",
        }
    }

    /// API path listing the audit logs of `id`, relative to the API base URL.
    pub fn endpoint(&self, id: &str) -> String {
        match self {
            LogCategory::Workspace => format!("/owners/{id}{AUDIT_LOGS_PATH}"),
            LogCategory::Organization => format!("/organizations/{id}{AUDIT_LOGS_PATH}"),
        }
    }

    /// Storage prefix shared by everything written for `id`.
    pub fn partition_prefix(&self, id: &str) -> String {
        format!("{}={id}", self.as_str())
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
