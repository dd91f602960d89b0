use async_trait::async_trait;

/// Audio handed to a transcription engine, with the metadata providers use
/// to detect the container format.
#[derive(Debug, Clone, Copy)]
pub struct AudioInput<'a> {
    pub data: &'a [u8],
    pub filename: &'a str,
    pub content_type: &'a str,
}

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio: AudioInput<'_>) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("engine configuration invalid: {0}")]
    Configuration(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
