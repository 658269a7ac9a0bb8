// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::SinkError;

/// Durable destination for encoded batches. Encryption and any other storage
/// policy is fixed when the sink is built.
#[async_trait]
pub trait BatchSink {
    /// Stores `body` at `path` and returns a locator for the written object.
    async fn put(&self, path: &str, body: Vec<u8>, content_type: &str)
        -> Result<String, SinkError>;
}
