use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Transient storage for uploaded bytes between receipt and forwarding.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Streams bytes into `path`, returning the number of bytes written.
    /// Nothing is left behind at `path` when the stream fails.
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError>;

    /// Removes `path`. Removing a path that is already gone succeeds.
    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    /// The incoming byte stream broke off before completion.
    #[error("upload stream failed: {0}")]
    Stream(#[from] io::Error),
    #[error("staging write failed: {0}")]
    Write(String),
    #[error("staged upload not found: {0}")]
    NotFound(String),
    #[error("staging read failed: {0}")]
    Read(String),
    #[error("staging delete failed: {0}")]
    Remove(String),
}
