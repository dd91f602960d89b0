use axum::http::StatusCode;
use axum::response::IntoResponse;

use murmur::application::ports::{StagingStoreError, TranscriptionError};
use murmur::application::services::TranscriptionServiceError;
use murmur::domain::{StoragePath, SummaryOutcome, TranscriptionOutcome, UploadedFile};
use murmur::presentation::ApiError;
use murmur::presentation::handlers::TranscribeResponse;

fn outcome(summary: SummaryOutcome) -> TranscriptionOutcome {
    TranscriptionOutcome {
        file: UploadedFile::new(
            "clip.wav".to_string(),
            Some("audio/wav".to_string()),
            3,
            StoragePath::from_raw("1-a-clip.wav"),
        ),
        transcript: "hello".to_string(),
        summary,
    }
}

#[test]
fn given_failed_summary_when_serializing_then_summary_is_null_and_error_is_flagged() {
    let response = TranscribeResponse::from(outcome(SummaryOutcome::Failed {
        reason: "HTTP 500: secret details".to_string(),
    }));

    let json = serde_json::to_value(&response).unwrap();

    assert!(json["summary"].is_null());
    assert_eq!(json["summary_error"], "Summarization failed");
    assert!(!json.to_string().contains("secret details"));
}

#[test]
fn given_disabled_summary_when_serializing_then_summary_fields_are_absent() {
    let response = TranscribeResponse::from(outcome(SummaryOutcome::Disabled));

    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["text"], "hello");
    assert!(json.get("summary").is_none());
    assert!(json.get("summary_error").is_none());
    assert_eq!(json["file"]["type"], "audio/wav");
}

#[test]
fn given_transcription_error_when_converting_then_maps_to_provider_500() {
    let error = ApiError::from(TranscriptionServiceError::Transcription(
        TranscriptionError::ApiRequestFailed("status 401".to_string()),
    ));

    assert!(matches!(error, ApiError::Provider(_)));
    assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn given_interrupted_upload_when_converting_then_maps_to_bad_request() {
    let error = ApiError::from(TranscriptionServiceError::Staging(StagingStoreError::Stream(
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated body"),
    )));

    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn given_disk_failure_when_converting_then_maps_to_internal_error() {
    let error = ApiError::from(TranscriptionServiceError::Staging(
        StagingStoreError::Write("disk full".to_string()),
    ));

    assert!(matches!(error, ApiError::Internal(_)));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn given_missing_file_when_converting_then_maps_to_bad_request() {
    assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
}
