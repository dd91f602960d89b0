use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;

use crate::application::ports::{AudioInput, TranscriptionEngine, TranscriptionError};

use super::provider_request::{audio_part, send};

/// Transcription through an Azure OpenAI deployment. The deployment fixes the
/// model, so only the file is sent; auth is the `api-key` header.
pub struct AzureTranscriptionEngine {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TranscriptionBody {
    text: String,
}

impl AzureTranscriptionEngine {
    pub fn new(endpoint: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version,
            ),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TranscriptionEngine for AzureTranscriptionEngine {
    async fn transcribe(&self, audio: AudioInput<'_>) -> Result<String, TranscriptionError> {
        let form = Form::new().part("file", audio_part(&audio)?);

        tracing::debug!(bytes = audio.data.len(), "Sending audio to Azure OpenAI deployment");

        let request = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .multipart(form);

        let body: TranscriptionBody = send(request)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("expected {{text}}: {}", e)))?;
        let transcript = body.text.trim();

        tracing::info!(chars = transcript.len(), "Azure OpenAI transcript received");

        Ok(transcript.to_string())
    }
}
