use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

use super::azure_transcription_engine::AzureTranscriptionEngine;
use super::openai_transcription_engine::OpenAiTranscriptionEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
        client: reqwest::Client,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        let key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                TranscriptionError::Configuration(format!(
                    "API key required for {:?} transcription",
                    settings.provider
                ))
            })?;

        tracing::info!(
            provider = ?settings.provider,
            model = %settings.model,
            "Transcription engine configured"
        );

        match settings.provider {
            TranscriptionProviderSetting::OpenAi => {
                let engine = OpenAiTranscriptionEngine::new(
                    key,
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                )
                .with_client(client);
                Ok(Arc::new(engine))
            }
            TranscriptionProviderSetting::Azure => {
                let endpoint = settings.azure_endpoint.as_deref().ok_or_else(|| {
                    TranscriptionError::Configuration(
                        "azure_endpoint required for azure transcription".to_string(),
                    )
                })?;
                let deployment = settings
                    .azure_deployment
                    .as_deref()
                    .unwrap_or(settings.model.as_str());
                let engine =
                    AzureTranscriptionEngine::new(endpoint, deployment, &key, &settings.azure_api_version)
                        .with_client(client);
                Ok(Arc::new(engine))
            }
        }
    }
}
