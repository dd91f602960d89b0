use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use serde::Deserialize;

use crate::application::ports::{
    AudioInput, StagingStore, StagingStoreError, Summarizer, SummarizerError, TranscriptionEngine,
    TranscriptionError,
};
use crate::domain::{StoragePath, SummaryOutcome, TranscriptionOutcome, UploadedFile};

use super::staged_upload::StagedUpload;

/// What to do with a good transcript when the summary step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFailurePolicy {
    /// Return the transcript with an empty summary and an error flag.
    #[default]
    Partial,
    /// Fail the whole request.
    Fail,
}

pub struct TranscriptionService {
    staging_store: Arc<dyn StagingStore>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    summarizer: Option<Arc<dyn Summarizer>>,
    summary_failure_policy: SummaryFailurePolicy,
    provider_timeout: Duration,
}

impl TranscriptionService {
    pub fn new(
        staging_store: Arc<dyn StagingStore>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            staging_store,
            transcription_engine,
            summarizer: None,
            summary_failure_policy: SummaryFailurePolicy::default(),
            provider_timeout,
        }
    }

    pub fn with_summarizer(
        mut self,
        summarizer: Arc<dyn Summarizer>,
        policy: SummaryFailurePolicy,
    ) -> Self {
        self.summarizer = Some(summarizer);
        self.summary_failure_policy = policy;
        self
    }

    pub fn summarization_enabled(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Streams one uploaded file into the staging store under a fresh,
    /// collision-resistant name.
    pub async fn stage(
        &self,
        original_filename: String,
        content_type: Option<String>,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StagedUpload, TranscriptionServiceError> {
        let path = StoragePath::new(&original_filename);

        let size_bytes = self
            .staging_store
            .store(&path, stream)
            .await
            .map_err(TranscriptionServiceError::Staging)?;

        tracing::debug!(
            path = %path,
            filename = %original_filename,
            bytes = size_bytes,
            "Upload staged"
        );

        let file = UploadedFile::new(original_filename, content_type, size_bytes, path);
        Ok(StagedUpload::new(file, Arc::clone(&self.staging_store)))
    }

    /// Transcribes a staged upload, releases it, then summarizes the
    /// transcript when a summarizer is configured.
    pub async fn process(
        &self,
        upload: StagedUpload,
    ) -> Result<TranscriptionOutcome, TranscriptionServiceError> {
        let transcript = self.transcribe_staged(&upload).await;
        let file = upload.release().await;
        let transcript = transcript?;

        tracing::info!(
            filename = %file.original_filename,
            bytes = file.size_bytes,
            chars = transcript.len(),
            "Transcription completed"
        );

        let summary = self.summarize(&transcript).await?;

        Ok(TranscriptionOutcome {
            file,
            transcript,
            summary,
        })
    }

    async fn transcribe_staged(
        &self,
        upload: &StagedUpload,
    ) -> Result<String, TranscriptionServiceError> {
        let data = upload
            .read()
            .await
            .map_err(TranscriptionServiceError::Staging)?;
        let file = upload.file();

        let audio = AudioInput {
            data: &data,
            filename: &file.original_filename,
            content_type: &file.content_type,
        };

        tokio::time::timeout(self.provider_timeout, self.transcription_engine.transcribe(audio))
            .await
            .map_err(|_| TranscriptionServiceError::TranscriptionTimedOut(self.provider_timeout))?
            .map_err(TranscriptionServiceError::Transcription)
    }

    async fn summarize(&self, transcript: &str) -> Result<SummaryOutcome, TranscriptionServiceError> {
        let Some(summarizer) = &self.summarizer else {
            return Ok(SummaryOutcome::Disabled);
        };

        let error = match tokio::time::timeout(
            self.provider_timeout,
            summarizer.summarize(transcript),
        )
        .await
        {
            Ok(Ok(summary)) => return Ok(SummaryOutcome::Completed(summary)),
            Ok(Err(e)) => TranscriptionServiceError::Summarization(e),
            Err(_) => TranscriptionServiceError::SummarizationTimedOut(self.provider_timeout),
        };

        match self.summary_failure_policy {
            SummaryFailurePolicy::Partial => Ok(SummaryOutcome::Failed {
                reason: error.to_string(),
            }),
            SummaryFailurePolicy::Fail => Err(error),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("staging failed: {0}")]
    Staging(StagingStoreError),
    #[error("transcription failed: {0}")]
    Transcription(TranscriptionError),
    #[error("transcription timed out after {0:?}")]
    TranscriptionTimedOut(Duration),
    #[error("summarization failed: {0}")]
    Summarization(SummarizerError),
    #[error("summarization timed out after {0:?}")]
    SummarizationTimedOut(Duration),
}

impl TranscriptionServiceError {
    pub fn is_provider_failure(&self) -> bool {
        !matches!(self, Self::Staging(_))
    }
}
