use std::sync::Arc;

use crate::application::ports::{Summarizer, SummarizerError};
use crate::presentation::config::{SummarizationProviderSetting, SummarizationSettings};

use super::chat_summarizer::{ChatAuth, ChatCompletionsSummarizer};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct SummarizerFactory;

impl SummarizerFactory {
    /// Returns `None` when summarization is switched off.
    pub fn create(
        settings: &SummarizationSettings,
        client: reqwest::Client,
    ) -> Result<Option<Arc<dyn Summarizer>>, SummarizerError> {
        if !settings.enabled {
            return Ok(None);
        }

        let summarizer = match settings.provider {
            SummarizationProviderSetting::OpenAi => ChatCompletionsSummarizer::new(
                settings.base_url.as_deref().unwrap_or(OPENAI_BASE_URL),
                None,
                ChatAuth::Bearer,
                required_api_key(settings)?,
                settings.model.clone(),
                settings.system_prompt.clone(),
            ),
            SummarizationProviderSetting::LmStudio => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    SummarizerError::Configuration(
                        "base_url required for lmstudio provider".to_string(),
                    )
                })?;
                ChatCompletionsSummarizer::new(
                    base_url,
                    None,
                    ChatAuth::Bearer,
                    settings.api_key.clone().unwrap_or_default(),
                    settings.model.clone(),
                    settings.system_prompt.clone(),
                )
            }
            SummarizationProviderSetting::Azure => {
                let endpoint = settings.azure_endpoint.as_deref().ok_or_else(|| {
                    SummarizerError::Configuration(
                        "azure_endpoint required for azure provider".to_string(),
                    )
                })?;
                let base_url = format!(
                    "{}/openai/deployments/{}",
                    endpoint.trim_end_matches('/'),
                    settings.model
                );
                let query = format!("api-version={}", settings.azure_api_version);
                ChatCompletionsSummarizer::new(
                    &base_url,
                    Some(&query),
                    ChatAuth::ApiKeyHeader,
                    required_api_key(settings)?,
                    settings.model.clone(),
                    settings.system_prompt.clone(),
                )
            }
        };

        tracing::info!(
            provider = ?settings.provider,
            model = %settings.model,
            "Summarizer configured"
        );

        Ok(Some(Arc::new(
            summarizer
                .with_client(client)
                .with_sampling(settings.max_tokens, settings.temperature),
        )))
    }
}

fn required_api_key(settings: &SummarizationSettings) -> Result<String, SummarizerError> {
    settings
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            SummarizerError::Configuration(format!(
                "API key required for {:?} summarization",
                settings.provider
            ))
        })
}
