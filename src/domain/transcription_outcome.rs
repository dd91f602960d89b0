use super::uploaded_file::UploadedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Disabled,
    Completed(String),
    /// Provider error text, for server-side logs only.
    Failed { reason: String },
}

impl SummaryOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Completed(text) => Some(text),
            Self::Disabled | Self::Failed { .. } => None,
        }
    }
}

/// Everything one upload produced. The staged file is already gone by the
/// time this exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionOutcome {
    pub file: UploadedFile,
    pub transcript: String,
    pub summary: SummaryOutcome,
}
