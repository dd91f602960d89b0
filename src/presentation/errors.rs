use std::io;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::StagingStoreError;
use crate::application::services::TranscriptionServiceError;
use crate::infrastructure::observability::redact_secrets;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every failure the upload endpoint can report. Provider and internal
/// errors keep their cause for the server log only.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no file uploaded")]
    MissingFile,
    #[error("more than one file uploaded")]
    MultipleFiles,
    #[error("invalid upload: {details}")]
    InvalidUpload { status: StatusCode, details: String },
    #[error("provider failure: {0}")]
    Provider(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn from_multipart(error: MultipartError) -> Self {
        Self::InvalidUpload {
            status: error.status(),
            details: error.body_text(),
        }
    }

    pub fn from_rejection(rejection: MultipartRejection) -> Self {
        Self::InvalidUpload {
            status: rejection.status(),
            details: rejection.body_text(),
        }
    }

    fn from_upload_io(error: &io::Error) -> Self {
        match error
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<MultipartError>())
        {
            Some(multipart) => Self::InvalidUpload {
                status: multipart.status(),
                details: multipart.body_text(),
            },
            None => Self::InvalidUpload {
                status: StatusCode::BAD_REQUEST,
                details: format!("Failed to read uploaded file: {}", error),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::MultipleFiles => StatusCode::BAD_REQUEST,
            Self::InvalidUpload { status, .. } => *status,
            Self::Provider(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TranscriptionServiceError> for ApiError {
    fn from(error: TranscriptionServiceError) -> Self {
        match &error {
            TranscriptionServiceError::Staging(StagingStoreError::Stream(io_error)) => {
                Self::from_upload_io(io_error)
            }
            e if e.is_provider_failure() => Self::Provider(error.to_string()),
            _ => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            Self::MissingFile => {
                tracing::warn!("Transcription request with no file");
                ErrorResponse {
                    error: "No file uploaded".to_string(),
                    details: None,
                }
            }
            Self::MultipleFiles => {
                tracing::warn!("Transcription request with more than one file");
                ErrorResponse {
                    error: "Only one file may be uploaded".to_string(),
                    details: None,
                }
            }
            Self::InvalidUpload { details, .. } => {
                tracing::warn!(status = %status, details = %details, "Rejected upload");
                ErrorResponse {
                    error: "Invalid upload".to_string(),
                    details: Some(details),
                }
            }
            Self::Provider(cause) => {
                tracing::error!(error = %redact_secrets(&cause), "Provider call failed");
                ErrorResponse {
                    error: "Transcription failed".to_string(),
                    details: None,
                }
            }
            Self::Internal(cause) => {
                tracing::error!(error = %redact_secrets(&cause), "Internal error");
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
