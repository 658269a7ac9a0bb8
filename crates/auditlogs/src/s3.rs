// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! S3 backed checkpoint store and batch sink.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::put_object::builders::PutObjectFluentBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ServerSideEncryption;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::category::LogCategory;
use crate::checkpoint::{checkpoint_key, Checkpoint, CheckpointStore};
use crate::config::S3Config;
use crate::error::{SinkError, StoreError};
use crate::sink::BatchSink;

const CHECKPOINT_CONTENT_TYPE: &str = "application/json";

/// Server side encryption applied to every object this store writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Encryption {
    None,
    /// SSE-S3 (AES256)
    #[default]
    S3Managed,
    /// SSE-KMS, with the bucket default key when `key_id` is unset.
    Kms {
        key_id: Option<String>,
        bucket_key_enabled: bool,
    },
}

impl Encryption {
    fn apply(&self, request: PutObjectFluentBuilder) -> PutObjectFluentBuilder {
        match self {
            Encryption::None => request,
            Encryption::S3Managed => request.server_side_encryption(ServerSideEncryption::Aes256),
            Encryption::Kms {
                key_id,
                bucket_key_enabled,
            } => {
                let mut request = request.server_side_encryption(ServerSideEncryption::AwsKms);
                if let Some(key_id) = key_id {
                    request = request.ssekms_key_id(key_id);
                }
                if *bucket_key_enabled {
                    request = request.bucket_key_enabled(true);
                }
                request
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    encryption: Encryption,
}

impl S3Store {
    pub fn new(client: Client, bucket: &str, encryption: Encryption) -> Self {
        S3Store {
            client,
            bucket: bucket.to_string(),
            encryption,
        }
    }

    /// Builds the client from the default AWS provider chain. An endpoint
    /// override switches to path style addressing for S3 compatible stores.
    pub async fn from_config(config: &S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.endpoint_url.is_some())
            .build();

        Self::new(
            Client::from_conf(s3_config),
            &config.bucket,
            config.encryption.clone(),
        )
    }

    fn locator(&self, key: &str) -> String {
        format!("s3://{}/{key}", self.bucket)
    }

    fn put_request(&self, key: &str, body: Vec<u8>, content_type: &str) -> PutObjectFluentBuilder {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type);
        self.encryption.apply(request)
    }
}

#[async_trait]
impl CheckpointStore for S3Store {
    async fn load(
        &self,
        category: LogCategory,
        id: &str,
    ) -> Result<Option<Checkpoint>, StoreError> {
        let key = checkpoint_key(category, id);
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_no_such_key())
                {
                    debug!("No checkpoint found at {}", self.locator(&key));
                    return Ok(None);
                }
                return Err(StoreError::Read(format!(
                    "error reading checkpoint from S3: {}",
                    DisplayErrorContext(&err)
                )));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Read(format!("error reading checkpoint body: {e}")))?
            .into_bytes();

        Checkpoint::from_json(&data).map(Some)
    }

    async fn save(
        &self,
        category: LogCategory,
        id: &str,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError> {
        let key = checkpoint_key(category, id);
        let body = checkpoint.to_json()?;

        self.put_request(&key, body, CHECKPOINT_CONTENT_TYPE)
            .send()
            .await
            .map_err(|err| {
                StoreError::Write(format!(
                    "error writing checkpoint to S3: {}",
                    DisplayErrorContext(&err)
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl BatchSink for S3Store {
    async fn put(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SinkError> {
        self.put_request(path, body, content_type)
            .send()
            .await
            .map_err(|err| {
                SinkError::Upload(format!(
                    "error uploading to S3: {}",
                    DisplayErrorContext(&err)
                ))
            })?;
        Ok(self.locator(path))
    }
}
