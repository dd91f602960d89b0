mod staged_upload;
mod transcription_service;

pub use staged_upload::StagedUpload;
pub use transcription_service::{
    SummaryFailurePolicy, TranscriptionService, TranscriptionServiceError,
};
