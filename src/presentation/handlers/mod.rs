mod health;
mod transcribe;

pub use health::{HealthResponse, LIVENESS_MESSAGE, health_handler, root_handler};
pub use transcribe::{FILE_FIELD, FileMetadata, TranscribeResponse, transcribe_handler};
