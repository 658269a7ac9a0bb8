// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::batch::{batch_path, encode_batch, BATCH_CONTENT_TYPE};
use crate::category::LogCategory;
use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::error::HarvestError;
use crate::model::AuditLogEntry;
use crate::partition::partition_by_day;
use crate::sink::BatchSink;
use crate::source::AuditLogSource;

/// Maximum number of entries requested per page.
pub const PAGE_SIZE: usize = 1000;

/// What a successful run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub entries: usize,
    pub batches: usize,
    /// The checkpoint written at the end of the run, if any entry was seen.
    pub checkpoint: Option<Checkpoint>,
}

/// Drains the audit log stream of one identity into day batches and records
/// how far it got.
///
/// A run is all or nothing with respect to the checkpoint: it is written once,
/// after the stream returned an empty page. Batches uploaded before a failure
/// stay uploaded and are uploaded again by the next run.
#[derive(Clone)]
pub struct LogProcessor {
    category: LogCategory,
    source: Arc<dyn AuditLogSource + Send + Sync>,
    checkpoints: Arc<dyn CheckpointStore + Send + Sync>,
    sink: Arc<dyn BatchSink + Send + Sync>,
}

impl LogProcessor {
    pub fn new(
        category: LogCategory,
        source: Arc<dyn AuditLogSource + Send + Sync>,
        checkpoints: Arc<dyn CheckpointStore + Send + Sync>,
        sink: Arc<dyn BatchSink + Send + Sync>,
    ) -> Self {
        LogProcessor {
            category,
            source,
            checkpoints,
            sink,
        }
    }

    pub fn category(&self) -> LogCategory {
        self.category
    }

    /// Must not run concurrently for the same `id`: the checkpoint is not locked.
    pub async fn process(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, HarvestError> {
        let mut cursor = until_cancelled(cancel, self.checkpoints.load(self.category, id))
            .await?
            .map_err(HarvestError::CheckpointLoad)?
            .map(|checkpoint| checkpoint.last_cursor)
            .unwrap_or_default();

        let endpoint = self.category.endpoint(id);
        let mut summary = RunSummary::default();
        let mut next_checkpoint: Option<Checkpoint> = None;

        loop {
            let page = until_cancelled(cancel, self.source.fetch(&endpoint, &cursor, PAGE_SIZE))
                .await?
                .map_err(HarvestError::SourceFetch)?;

            info!("found {} audit log entries", page.len());

            let Some(last) = page.last() else {
                break;
            };

            summary.batches += self.upload_page(id, &page, cancel).await?;
            summary.pages += 1;
            summary.entries += page.len();

            cursor = last.cursor.clone();
            next_checkpoint = Some(Checkpoint {
                last_cursor: last.cursor.clone(),
                last_timestamp: last.timestamp(),
            });
        }

        info!("final cursor processed: {cursor:?}");

        if let Some(checkpoint) = next_checkpoint {
            info!("updating checkpoint");
            until_cancelled(cancel, self.checkpoints.save(self.category, id, &checkpoint))
                .await?
                .map_err(HarvestError::CheckpointSave)?;
            summary.checkpoint = Some(checkpoint);
        }

        Ok(summary)
    }

    /// Uploads every day window of `page` in order and returns how many were written.
    async fn upload_page(
        &self,
        id: &str,
        page: &[AuditLogEntry],
        cancel: &CancellationToken,
    ) -> Result<usize, HarvestError> {
        let mut uploaded = 0;
        let mut window_start = 0;

        for window in partition_by_day(page) {
            let window_end = window_start + window.len();
            debug!("upload start={window_start} end={window_end}");

            // partition_by_day never yields an empty window
            let path = batch_path(self.category, id, window[0].timestamp());
            let body = encode_batch(window).map_err(HarvestError::SinkUpload)?;

            match until_cancelled(cancel, self.sink.put(&path, body, BATCH_CONTENT_TYPE)).await? {
                Ok(locator) => info!("audit logs uploaded to {locator}"),
                Err(e) => {
                    error!("error uploading audit logs: {e}");
                    return Err(HarvestError::SinkUpload(e));
                }
            }

            uploaded += 1;
            window_start = window_end;
        }

        Ok(uploaded)
    }
}

/// Races `fut` against the cancellation token. Cancellation wins ties so no
/// further work starts once it was requested.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, HarvestError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(HarvestError::Cancelled),
        output = fut => Ok(output),
    }
}
