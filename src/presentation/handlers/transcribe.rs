use std::io;

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use futures::{StreamExt, TryStreamExt};
use serde::Serialize;

use crate::application::services::StagedUpload;
use crate::domain::{SummaryOutcome, TranscriptionOutcome};
use crate::infrastructure::observability::redact_secrets;
use crate::presentation::errors::ApiError;
use crate::presentation::state::AppState;

pub const FILE_FIELD: &str = "file";
const FALLBACK_FILENAME: &str = "upload";
const SUMMARY_FAILED_MESSAGE: &str = "Summarization failed";

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    /// Absent when summarization is off, `null` when it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
    pub file: FileMetadata,
}

#[derive(Debug, Serialize)]
pub struct FileMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: u64,
}

impl From<TranscriptionOutcome> for TranscribeResponse {
    fn from(outcome: TranscriptionOutcome) -> Self {
        let (summary, summary_error) = match outcome.summary {
            SummaryOutcome::Disabled => (None, None),
            SummaryOutcome::Completed(text) => (Some(Some(text)), None),
            SummaryOutcome::Failed { .. } => (Some(None), Some(SUMMARY_FAILED_MESSAGE.to_string())),
        };

        Self {
            text: outcome.transcript,
            summary,
            summary_error,
            file: FileMetadata {
                name: outcome.file.original_filename,
                content_type: outcome.file.content_type,
                size: outcome.file.size_bytes,
            },
        }
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut multipart = multipart.map_err(ApiError::from_rejection)?;
    let upload = receive_upload(&state, &mut multipart).await?;

    tracing::info!(
        filename = %upload.file().original_filename,
        content_type = %upload.file().content_type,
        bytes = upload.file().size_bytes,
        "Upload received"
    );

    let outcome = state.transcription_service.process(upload).await?;

    if let SummaryOutcome::Failed { reason } = &outcome.summary {
        tracing::warn!(
            error = %redact_secrets(reason),
            "Summarization failed, returning transcript only"
        );
    }

    Ok(Json(TranscribeResponse::from(outcome)))
}

/// Walks the multipart body, staging the single `file` part. Other parts,
/// and plain text fields that happen to be named `file`, are skipped. A
/// second `file` part rejects the request.
async fn receive_upload(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<StagedUpload, ApiError> {
    let mut staged: Option<StagedUpload> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                release(staged.take()).await;
                return Err(ApiError::from_multipart(e));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping non-file multipart field");
            continue;
        }

        let filename = match field.file_name() {
            Some("") => FALLBACK_FILENAME.to_string(),
            Some(name) => name.to_string(),
            None => {
                tracing::debug!("Skipping `file` part without a filename");
                continue;
            }
        };

        if staged.is_some() {
            release(staged.take()).await;
            return Err(ApiError::MultipleFiles);
        }

        let content_type = field.content_type().map(str::to_string);
        let stream = field.map_err(io::Error::other).boxed();

        let upload = state
            .transcription_service
            .stage(filename, content_type, stream)
            .await?;
        staged = Some(upload);
    }

    staged.ok_or(ApiError::MissingFile)
}

async fn release(upload: Option<StagedUpload>) {
    if let Some(upload) = upload {
        upload.release().await;
    }
}
