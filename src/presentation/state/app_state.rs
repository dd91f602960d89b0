use std::sync::Arc;
use std::time::Instant;

use crate::application::services::TranscriptionService;

/// Request-independent collaborators, built once at startup and shared by
/// every handler.
#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub max_upload_bytes: usize,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(transcription_service: Arc<TranscriptionService>, max_upload_bytes: usize) -> Self {
        Self {
            transcription_service,
            max_upload_bytes,
            started_at: Instant::now(),
        }
    }
}
