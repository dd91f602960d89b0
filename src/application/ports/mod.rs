mod staging_store;
mod summarizer;
mod transcription_engine;

pub use staging_store::{StagingStore, StagingStoreError};
pub use summarizer::{Summarizer, SummarizerError};
pub use transcription_engine::{AudioInput, TranscriptionEngine, TranscriptionError};
