use std::fmt;

use chrono::Utc;
use uuid::Uuid;

const FALLBACK_NAME: &str = "upload";

/// Location of a staged upload inside the staging store.
///
/// Names are `<unix-millis>-<uuid>-<sanitized original name>`, so identical
/// uploads arriving at the same instant never share a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(original_filename: &str) -> Self {
        Self(format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize_filename(original_filename)
        ))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips every character outside `[A-Za-z0-9._-]`.
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        sanitized
    }
}
