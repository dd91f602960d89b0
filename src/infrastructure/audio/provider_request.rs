use reqwest::multipart::Part;

use crate::application::ports::{AudioInput, TranscriptionError};
use crate::domain::sanitize_filename;

/// The `file` part of a transcription upload. Providers sniff the container
/// from the filename extension, so the sanitized original name is kept.
pub(super) fn audio_part(audio: &AudioInput<'_>) -> Result<Part, TranscriptionError> {
    Part::bytes(audio.data.to_vec())
        .file_name(sanitize_filename(audio.filename))
        .mime_str(audio.content_type)
        .map_err(|e| {
            TranscriptionError::TranscriptionFailed(format!(
                "unusable content type {:?}: {}",
                audio.content_type, e
            ))
        })
}

pub(super) async fn send(
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, TranscriptionError> {
    let response = request
        .send()
        .await
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TranscriptionError::ApiRequestFailed(format!(
        "HTTP {}: {}",
        status, body
    )))
}
