use async_trait::async_trait;
use reqwest::multipart::Form;

use crate::application::ports::{AudioInput, TranscriptionEngine, TranscriptionError};

use super::provider_request::{audio_part, send};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";

/// `POST {base_url}/audio/transcriptions` with `response_format=text`, so the
/// body is the transcript itself.
pub struct OpenAiTranscriptionEngine {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiTranscriptionEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiTranscriptionEngine {
    async fn transcribe(&self, audio: AudioInput<'_>) -> Result<String, TranscriptionError> {
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", audio_part(&audio)?);

        tracing::debug!(
            model = %self.model,
            bytes = audio.data.len(),
            "Sending audio to OpenAI"
        );

        let request = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .multipart(form);

        let transcript = send(request)
            .await?
            .text()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("body: {}", e)))?;
        let transcript = transcript.trim();

        tracing::info!(model = %self.model, chars = transcript.len(), "OpenAI transcript received");

        Ok(transcript.to_string())
    }
}
