use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Summarizer, SummarizerError};

/// How the summarizer authenticates against its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatAuth {
    Bearer,
    ApiKeyHeader,
}

/// Summarizer backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsSummarizer {
    client: Client,
    auth: ChatAuth,
    completions_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    system_prompt: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatCompletionsSummarizer {
    /// `base_url` is the API root the `/chat/completions` path is appended
    /// to; `query` is appended verbatim after it (Azure's `api-version`).
    pub fn new(
        base_url: &str,
        query: Option<&str>,
        auth: ChatAuth,
        api_key: String,
        model: String,
        system_prompt: String,
    ) -> Self {
        let completions_url = match query {
            Some(q) => format!("{}/chat/completions?{}", base_url.trim_end_matches('/'), q),
            None => format!("{}/chat/completions", base_url.trim_end_matches('/')),
        };

        Self {
            client: Client::new(),
            auth,
            completions_url,
            api_key,
            model,
            max_tokens: 512,
            temperature: 0.3,
            system_prompt,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_sampling(mut self, max_tokens: usize, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn build_messages(&self, transcript: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: Some(self.system_prompt.clone()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: Some(transcript.to_string()),
            },
        ]
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth {
            ChatAuth::ApiKeyHeader => request.header("api-key", &self.api_key),
            ChatAuth::Bearer => request.bearer_auth(&self.api_key),
        }
    }
}

#[async_trait]
impl Summarizer for ChatCompletionsSummarizer {
    async fn summarize(&self, transcript: &str) -> Result<String, SummarizerError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: self.build_messages(transcript),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, chars = transcript.len(), "Requesting summary");

        let request = self.client.post(&self.completions_url).json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| SummarizerError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SummarizerError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizerError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        let summary = completion_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SummarizerError::InvalidResponse("empty choices".to_string()))?;

        tracing::info!(chars = summary.len(), "Summary completed");

        Ok(summary.trim().to_string())
    }
}
