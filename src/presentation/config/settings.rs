use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::SummaryFailurePolicy;

use super::Environment;

const DEFAULT_SYSTEM_PROMPT: &str = "Summarize the transcription concisely.";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub summarization: SummarizationSettings,
    pub upload: UploadSettings,
    pub providers: ProviderSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizationSettings {
    pub enabled: bool,
    pub provider: SummarizationProviderSetting,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_api_version: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub system_prompt: String,
    pub on_failure: SummaryFailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
    #[serde(rename = "lmstudio")]
    LmStudio,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub staging_dir: String,
    pub max_file_size_mb: usize,
}

impl UploadSettings {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Settings {
    /// Loads settings from defaults, `config/base.toml`,
    /// `config/<environment>.toml` and `APP_`-prefixed environment variables,
    /// in that order. `PORT` and `OPENAI_API_KEY` are honored last.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        Self::builder(environment)?.build()?.try_deserialize()
    }

    fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let api_key = non_blank_env("OPENAI_API_KEY");

        Config::builder()
            .set_default("environment", environment.as_str())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001_i64)?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.azure_api_version", "2024-06-01")?
            .set_default("summarization.enabled", true)?
            .set_default("summarization.provider", "openai")?
            .set_default("summarization.model", "gpt-4o-mini")?
            .set_default("summarization.azure_api_version", "2024-06-01")?
            .set_default("summarization.max_tokens", 512_i64)?
            .set_default("summarization.temperature", 0.3_f64)?
            .set_default("summarization.system_prompt", DEFAULT_SYSTEM_PROMPT)?
            .set_default("summarization.on_failure", "partial")?
            .set_default("upload.staging_dir", "uploads")?
            .set_default("upload.max_file_size_mb", 25_i64)?
            .set_default("providers.timeout_secs", 120_i64)?
            .set_default("providers.connect_timeout_secs", 10_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/base").required(false))
            .add_source(
                File::with_name(&format!("config/{}", environment.config_name())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", non_blank_env("PORT"))?
            .set_override_option("transcription.api_key", api_key.clone())?
            .set_override_option("summarization.api_key", api_key)
    }
}

/// Unset and blank variables are treated alike, so an empty `KEY=` line in a
/// `.env` file does not shadow the `APP_*` layer.
fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
