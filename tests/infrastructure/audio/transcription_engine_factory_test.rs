use murmur::application::ports::TranscriptionError;
use murmur::infrastructure::audio::TranscriptionEngineFactory;
use murmur::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

fn settings(provider: TranscriptionProviderSetting, api_key: Option<&str>) -> TranscriptionSettings {
    TranscriptionSettings {
        provider,
        model: "whisper-1".to_string(),
        api_key: api_key.map(str::to_string),
        base_url: None,
        azure_endpoint: None,
        azure_deployment: None,
        azure_api_version: "2024-06-01".to_string(),
    }
}

#[test]
fn given_openai_with_key_when_creating_then_engine_is_built() {
    let result = TranscriptionEngineFactory::create(
        &settings(TranscriptionProviderSetting::OpenAi, Some("sk-test")),
        reqwest::Client::new(),
    );

    assert!(result.is_ok());
}

#[test]
fn given_missing_or_blank_key_when_creating_then_returns_configuration_error() {
    for key in [None, Some("  ")] {
        let result = TranscriptionEngineFactory::create(
            &settings(TranscriptionProviderSetting::OpenAi, key),
            reqwest::Client::new(),
        );

        assert!(matches!(result, Err(TranscriptionError::Configuration(_))));
    }
}

#[test]
fn given_azure_without_endpoint_when_creating_then_returns_configuration_error() {
    let result = TranscriptionEngineFactory::create(
        &settings(TranscriptionProviderSetting::Azure, Some("azure-key")),
        reqwest::Client::new(),
    );

    assert!(matches!(result, Err(TranscriptionError::Configuration(_))));
}

#[test]
fn given_azure_with_endpoint_when_creating_then_engine_is_built() {
    let mut azure = settings(TranscriptionProviderSetting::Azure, Some("azure-key"));
    azure.azure_endpoint = Some("https://example.openai.azure.com".to_string());

    let result = TranscriptionEngineFactory::create(&azure, reqwest::Client::new());

    assert!(result.is_ok());
}
