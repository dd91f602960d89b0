use super::storage_path::StoragePath;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub storage_path: StoragePath,
}

impl UploadedFile {
    pub fn new(
        original_filename: String,
        content_type: Option<String>,
        size_bytes: u64,
        storage_path: StoragePath,
    ) -> Self {
        Self {
            original_filename,
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            size_bytes,
            storage_path,
        }
    }
}
