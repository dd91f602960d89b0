use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, WriteMultipart};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Parts handed to the filesystem are at least this large; smaller multipart
/// chunks are coalesced first.
const WRITE_CHUNK_BYTES: usize = 1024 * 1024;

/// Staging store rooted at a local directory.
pub struct LocalStagingStore {
    fs: LocalFileSystem,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path)
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;
        Ok(Self { fs })
    }

    fn object_path(path: &StoragePath) -> ObjectPath {
        ObjectPath::from(path.as_str())
    }
}

fn read_error(error: object_store::Error) -> StagingStoreError {
    match error {
        object_store::Error::NotFound { path, .. } => StagingStoreError::NotFound(path),
        other => StagingStoreError::Read(other.to_string()),
    }
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let upload = self
            .fs
            .put_multipart(&Self::object_path(path))
            .await
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;
        let mut writer = WriteMultipart::new_with_chunk_size(upload, WRITE_CHUNK_BYTES);
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    written += bytes.len() as u64;
                    writer.put(bytes);
                }
                Err(e) => {
                    if let Err(abort_error) = writer.abort().await {
                        tracing::warn!(
                            error = %abort_error,
                            path = %path,
                            "Failed to abort partial staging write"
                        );
                    }
                    return Err(StagingStoreError::Stream(e));
                }
            }
        }

        writer
            .finish()
            .await
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;

        Ok(written)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError> {
        self.fs
            .get(&Self::object_path(path))
            .await
            .map_err(read_error)?
            .bytes()
            .await
            .map_err(read_error)
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        match self.fs.delete(&Self::object_path(path)).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StagingStoreError::Remove(e.to_string())),
        }
    }
}
