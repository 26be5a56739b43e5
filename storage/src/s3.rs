//! S3-compatible [`ObjectStore`] backend.
//!
//! Retry and timeout policy live here, in the SDK client: standard
//! retries with the configured initial backoff and attempt count, and
//! the total budget applied as the per-operation timeout. Nothing
//! above this layer retries.

use async_trait::async_trait;
use aws_config::retry::RetryConfig as AwsRetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use errors::StoreError;
use std::time::Duration;

use config::ObjectStoreConfig;
use nb_core::traits::ObjectStore;

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    read_buffer_bytes: usize,
}

impl S3ObjectStore {
    /// Builds a client from the store configuration, including the
    /// endpoint/path-style overrides needed for MinIO-style
    /// deployments.
    pub async fn new(config: &ObjectStoreConfig) -> Self {
        let retry = AwsRetryConfig::standard()
            .with_max_attempts(config.retry.max_attempts)
            .with_initial_backoff(Duration::from_millis(config.retry.initial_delay_ms));
        let timeout = TimeoutConfig::builder()
            .operation_timeout(Duration::from_millis(config.retry.total_budget_ms))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .retry_config(retry)
            .timeout_config(timeout);
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            read_buffer_bytes: config.read_buffer_bytes,
        }
    }

    /// Wraps an existing client, e.g. one shared with other subsystems.
    pub fn from_client(client: aws_sdk_s3::Client, read_buffer_bytes: usize) -> Self {
        Self {
            client,
            read_buffer_bytes,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    type Error = StoreError;

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| StoreError::Io {
                operation: "list_objects_v2".to_string(),
                reason: e.to_string(),
            })?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }

    async fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StoreError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StoreError::Io {
                        operation: "get_object".to_string(),
                        reason: service_error.to_string(),
                    }
                }
            })?;

        // Drain the body chunk-by-chunk; the buffer hint bounds the
        // initial allocation, not the object size.
        let expected = usize::try_from(resp.content_length().unwrap_or(0)).unwrap_or(0);
        let mut buf = Vec::with_capacity(expected.min(self.read_buffer_bytes));
        let mut body = resp.body;
        while let Some(chunk) = body.try_next().await.map_err(|e| StoreError::Io {
            operation: "read_body".to_string(),
            reason: e.to_string(),
        })? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }

    async fn write(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let body = aws_sdk_s3::primitives::ByteStream::from(bytes::Bytes::from(bytes));
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Io {
                operation: "put_object".to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        // S3 DeleteObject succeeds for absent keys, which matches the
        // idempotent contract of this trait.
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::Io {
                operation: "delete_object".to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
