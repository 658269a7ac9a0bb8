// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Incremental harvesting of Render audit logs.
//!
//! Each identity (a workspace or an organization) is drained page by page from
//! the audit log API, every page is split into day windows, each window is
//! uploaded as a gzipped JSON batch and, once the stream is exhausted, the
//! position of the last entry is saved so the next run resumes from there.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod category;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod model;
pub mod partition;
pub mod pool;
pub mod processor;
pub mod s3;
pub mod sink;
pub mod source;

pub use category::LogCategory;
pub use checkpoint::{Checkpoint, CheckpointStore};
pub use config::Config;
pub use error::{ConfigError, HarvestError, SinkError, SourceError, StoreError};
pub use model::AuditLogEntry;
pub use pool::{HarvestReport, HarvestTarget, Harvester};
pub use processor::{LogProcessor, RunSummary, PAGE_SIZE};
pub use sink::BatchSink;
pub use source::{AuditLogSource, RenderClient};
