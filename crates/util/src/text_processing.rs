//! # Text Processing Utilities
//!
//! Redaction and size limiting for engine diagnostics before they are logged
//! or handed back to the calling agent. Engine error output routinely echoes
//! kubeconfig fragments, so credentials are masked first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound for diagnostic text forwarded to callers.
pub const MAX_DIAGNOSTIC_BYTES: usize = 16 * 1024;

const TRUNCATION_MARKER: &str = "…[truncated]";

/// Redacts values that look like secrets in a string.
///
/// Key names are preserved so the diagnostic still points at the offending
/// setting.
///
/// # Example
/// ```rust
/// use ktl_reports_util::text_processing::redact_sensitive;
///
/// let redacted = redact_sensitive("Authorization: Bearer abc.def");
/// assert_eq!(redacted, "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, "[REDACTED]")
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in get_redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}{}", prefix, replacement)
            })
            .to_string();
    }

    redacted
}

/// Returns compiled regex patterns for detecting sensitive information.
///
/// Every pattern captures the key (group 1) and the value (group 2).
pub fn get_redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

    &REDACT_PATTERNS
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(authorization:\s+)([^\r\n]+)",
        r"(?i)((?:^|\b)Bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)((?:client-key-data|client-certificate-data|token|password|secret)\s*[:=]\s*)([^\s,]+)",
        r"(?i)([A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

/// Truncates `input` to at most `max_bytes`, respecting character boundaries.
///
/// A marker is appended when anything was cut.
pub fn truncate_diagnostic(input: &str, max_bytes: usize) -> String {
    if input.len() <= max_bytes {
        return input.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &input[..end], TRUNCATION_MARKER)
}

/// Redacts and size-limits engine diagnostic output.
pub fn sanitize_diagnostic(input: &str) -> String {
    truncate_diagnostic(redact_sensitive(input.trim_end()).as_str(), MAX_DIAGNOSTIC_BYTES)
}
