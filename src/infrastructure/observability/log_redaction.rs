const MAX_VISIBLE_LENGTH: usize = 200;

const SECRET_MARKERS: [&str; 7] = [
    "Bearer ",
    "api-key: ",
    "api_key=",
    "\"api_key\":\"",
    "sk-",
    "secret=",
    "token=",
];

/// Makes provider error text safe to log: truncates it and masks anything
/// that looks like a credential.
pub fn redact_secrets(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = SECRET_MARKERS
        .iter()
        .fold(trimmed.to_string(), |acc, marker| redact_marker(&acc, marker));

    truncate(&redacted)
}

fn redact_marker(text: &str, marker: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find(marker) {
        let value_start = idx + marker.len();
        let value_end = rest[value_start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\'' | ',' | '}'))
            .map(|i| value_start + i)
            .unwrap_or(rest.len());

        result.push_str(&rest[..value_start]);
        result.push_str("[REDACTED]");
        rest = &rest[value_end..];
    }

    result.push_str(rest);
    result
}

fn truncate(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count <= MAX_VISIBLE_LENGTH {
        return text.to_string();
    }

    let visible: String = text.chars().take(MAX_VISIBLE_LENGTH).collect();
    format!("{}... ({} chars total)", visible, char_count)
}
