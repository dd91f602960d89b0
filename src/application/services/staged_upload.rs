use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::UploadedFile;

/// A staged upload whose lifetime is bound to one request.
///
/// `release` deletes the staged bytes. If the guard is dropped without being
/// released (request future cancelled, panic), deletion is scheduled on the
/// current runtime instead.
pub struct StagedUpload {
    file: UploadedFile,
    store: Arc<dyn StagingStore>,
    released: bool,
}

impl StagedUpload {
    pub fn new(file: UploadedFile, store: Arc<dyn StagingStore>) -> Self {
        Self {
            file,
            store,
            released: false,
        }
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }

    pub async fn read(&self) -> Result<Bytes, StagingStoreError> {
        self.store.fetch(&self.file.storage_path).await
    }

    pub async fn release(mut self) -> UploadedFile {
        if let Err(e) = self.store.delete(&self.file.storage_path).await {
            tracing::warn!(
                error = %e,
                path = %self.file.storage_path,
                "Failed to delete staged upload"
            );
        } else {
            tracing::debug!(path = %self.file.storage_path, "Staged upload released");
        }
        self.released = true;
        self.file.clone()
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let store = Arc::clone(&self.store);
        let path = self.file.storage_path.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(path = %path, "Staged upload dropped unreleased, scheduling delete");
                handle.spawn(async move {
                    if let Err(e) = store.delete(&path).await {
                        tracing::warn!(error = %e, path = %path, "Deferred staged upload delete failed");
                    }
                });
            }
            Err(_) => {
                tracing::error!(path = %path, "No runtime to release staged upload; file leaked");
            }
        }
    }
}
