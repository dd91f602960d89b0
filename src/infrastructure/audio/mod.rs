mod azure_transcription_engine;
mod openai_transcription_engine;
mod provider_request;
mod transcription_engine_factory;

pub use azure_transcription_engine::AzureTranscriptionEngine;
pub use openai_transcription_engine::OpenAiTranscriptionEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
