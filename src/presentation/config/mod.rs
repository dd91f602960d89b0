mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    LoggingSettings, ProviderSettings, ServerSettings, Settings, SummarizationProviderSetting,
    SummarizationSettings, TranscriptionProviderSetting, TranscriptionSettings, UploadSettings,
};
