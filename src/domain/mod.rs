mod storage_path;
mod transcription_outcome;
mod uploaded_file;

pub use storage_path::{StoragePath, sanitize_filename};
pub use transcription_outcome::{SummaryOutcome, TranscriptionOutcome};
pub use uploaded_file::UploadedFile;
