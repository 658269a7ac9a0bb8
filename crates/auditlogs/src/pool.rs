// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded fan-out of harvest runs, one task per identity.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};

use crate::category::LogCategory;
use crate::checkpoint::CheckpointStore;
use crate::error::HarvestError;
use crate::processor::{LogProcessor, RunSummary};
use crate::sink::BatchSink;
use crate::source::AuditLogSource;

pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestTarget {
    pub category: LogCategory,
    pub id: String,
}

impl HarvestTarget {
    pub fn new(category: LogCategory, id: &str) -> Self {
        HarvestTarget {
            category,
            id: id.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct HarvestReport {
    pub target: HarvestTarget,
    pub result: Result<RunSummary, HarvestError>,
}

/// Runs one [`LogProcessor`] per target with at most `max_concurrency` runs
/// in flight. Runs share nothing but the collaborators, which are stateless.
pub struct Harvester {
    source: Arc<dyn AuditLogSource + Send + Sync>,
    checkpoints: Arc<dyn CheckpointStore + Send + Sync>,
    sink: Arc<dyn BatchSink + Send + Sync>,
    max_concurrency: usize,
}

impl Harvester {
    pub fn new(
        source: Arc<dyn AuditLogSource + Send + Sync>,
        checkpoints: Arc<dyn CheckpointStore + Send + Sync>,
        sink: Arc<dyn BatchSink + Send + Sync>,
        max_concurrency: usize,
    ) -> Self {
        Harvester {
            source,
            checkpoints,
            sink,
            max_concurrency: max_concurrency.max(1),
        }
    }

    fn processor(&self, category: LogCategory) -> LogProcessor {
        LogProcessor::new(
            category,
            Arc::clone(&self.source),
            Arc::clone(&self.checkpoints),
            Arc::clone(&self.sink),
        )
    }

    /// Harvests every target and waits for all of them. A failed run is
    /// logged and reported without affecting the others. Reports come back in
    /// target order.
    pub async fn run(
        &self,
        targets: Vec<HarvestTarget>,
        cancel: &CancellationToken,
    ) -> Vec<HarvestReport> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(targets.len());

        for target in targets {
            // The semaphore is local and never closed, so this cannot fail.
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Unable to schedule {} {}: {e}", target.category, target.id);
                    handles.push((target, Err(HarvestError::Task(e.to_string()))));
                    continue;
                }
            };

            let processor = self.processor(target.category);
            let cancel = cancel.clone();
            let id = target.id.clone();
            let span = info_span!("harvest", category = %target.category, identity = %target.id);

            let handle = tokio::spawn(
                async move {
                    let _permit = permit;
                    info!("processing {}", processor.category());
                    let result = processor.process(&id, &cancel).await;
                    match &result {
                        Ok(summary) => info!(
                            "processed {} entries in {} pages, uploaded {} batches",
                            summary.entries, summary.pages, summary.batches
                        ),
                        Err(e) => error!("Error processing audit logs: {e}"),
                    }
                    result
                }
                .instrument(span),
            );
            handles.push((target, Ok(handle)));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (target, handle) in handles {
            let result = match handle {
                Ok(handle) => handle.await.unwrap_or_else(|e| {
                    error!("Harvest task for {} {} failed: {e}", target.category, target.id);
                    Err(HarvestError::Task(e.to_string()))
                }),
                Err(e) => Err(e),
            };
            reports.push(HarvestReport { target, result });
        }

        info!("all identities processed");
        reports
    }
}
