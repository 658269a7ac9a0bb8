// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! In-memory collaborators for driving the processor in tests

#![allow(dead_code)]

use async_trait::async_trait;
use auditlogs::checkpoint::checkpoint_key;
use auditlogs::{
    AuditLogEntry, AuditLogSource, BatchSink, Checkpoint, CheckpointStore, LogCategory, SinkError,
    SourceError, StoreError,
};
use flate2::read::GzDecoder;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub endpoint: String,
    pub cursor: String,
    pub limit: usize,
}

/// Serves pages out of a fixed, ordered stream. Like the real API, an unknown
/// cursor starts from the beginning.
#[derive(Default)]
pub struct MockSource {
    pub entries: Vec<AuditLogEntry>,
    /// Fail every call from this (zero based) call on
    pub fail_from_call: Option<usize>,
    /// Never answer, to exercise cancellation
    pub hang: bool,
    pub calls: Mutex<Vec<FetchCall>>,
}

impl MockSource {
    pub fn new(entries: Vec<AuditLogEntry>) -> Self {
        MockSource {
            entries,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        MockSource {
            fail_from_call: Some(0),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditLogSource for MockSource {
    async fn fetch(
        &self,
        endpoint: &str,
        cursor: &str,
        limit: usize,
    ) -> Result<Vec<AuditLogEntry>, SourceError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(FetchCall {
                endpoint: endpoint.to_string(),
                cursor: cursor.to_string(),
                limit,
            });
            calls.len() - 1
        };

        if self.hang {
            std::future::pending::<()>().await;
        }

        if self.fail_from_call.is_some_and(|from| call_index >= from) {
            return Err(SourceError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }

        let start = self
            .entries
            .iter()
            .position(|entry| entry.cursor == cursor)
            .map_or(0, |i| i + 1);
        let end = (start + limit).min(self.entries.len());
        Ok(self.entries[start..end].to_vec())
    }
}

/// Checkpoints keyed like the real store. `initial` is what every identity
/// without a saved checkpoint sees.
#[derive(Default)]
pub struct MemoryCheckpointStore {
    pub initial: Option<Checkpoint>,
    pub saved: Mutex<BTreeMap<String, Checkpoint>>,
    pub last_saved: Mutex<Option<Checkpoint>>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub loads: AtomicUsize,
    pub saves: AtomicUsize,
}

impl MemoryCheckpointStore {
    pub fn with_checkpoint(checkpoint: Checkpoint) -> Self {
        MemoryCheckpointStore {
            initial: Some(checkpoint),
            ..Default::default()
        }
    }

    /// The most recently saved checkpoint, or the initial one.
    pub fn current(&self) -> Option<Checkpoint> {
        self.last_saved
            .lock()
            .unwrap()
            .clone()
            .or_else(|| self.initial.clone())
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(
        &self,
        category: LogCategory,
        id: &str,
    ) -> Result<Option<Checkpoint>, StoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load {
            return Err(StoreError::Read("cannot access s3".to_string()));
        }
        let saved = self.saved.lock().unwrap();
        Ok(saved
            .get(&checkpoint_key(category, id))
            .cloned()
            .or_else(|| self.initial.clone()))
    }

    async fn save(
        &self,
        category: LogCategory,
        id: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(StoreError::Write("cannot access s3".to_string()));
        }
        self.saved
            .lock()
            .unwrap()
            .insert(checkpoint_key(category, id), checkpoint.clone());
        *self.last_saved.lock().unwrap() = Some(checkpoint.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub path: String,
    pub content_type: String,
    pub entries: Vec<AuditLogEntry>,
}

/// Records every batch, decoded back into entries.
#[derive(Default)]
pub struct MemorySink {
    /// Fail the put with this (zero based) index and every one after it
    pub fail_from_put: Option<usize>,
    pub attempts: AtomicUsize,
    pub uploads: Mutex<Vec<Upload>>,
}

impl MemorySink {
    pub fn failing_from(put: usize) -> Self {
        MemorySink {
            fail_from_put: Some(put),
            ..Default::default()
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchSink for MemorySink {
    async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SinkError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_from_put.is_some_and(|from| attempt >= from) {
            return Err(SinkError::Upload("cannot access s3".to_string()));
        }

        let mut json = String::new();
        GzDecoder::new(&body[..])
            .read_to_string(&mut json)
            .map_err(|e| SinkError::Encode(e.to_string()))?;
        let entries: Vec<AuditLogEntry> =
            serde_json::from_str(&json).map_err(|e| SinkError::Encode(e.to_string()))?;

        self.uploads.lock().unwrap().push(Upload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            entries,
        });
        Ok(format!("s3://bucket/{path}"))
    }
}
