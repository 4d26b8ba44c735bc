//! Form-side URL validation for saved shortcuts.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// Why a shortcut URL was refused by the form validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("URL is empty")]
    Empty,
    #[error("URL could not be parsed: {0}")]
    Unparsable(String),
    #[error("URL has no hostname")]
    MissingHost,
    #[error("hostname must contain a dot: {0}")]
    MissingDot(String),
    #[error("hostname is not a valid domain name: {0}")]
    InvalidHostname(String),
}

impl FormatError {
    /// Message shown next to the shortcut form.
    pub fn user_message(&self) -> &'static str {
        "Please enter a valid URL (e.g., example.com)"
    }
}

/// Trim the input and prepend `https://` unless it already names http(s).
pub fn normalize_input_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Validate a URL typed into the shortcut form.
///
/// Returns the normalized input (trimmed, scheme added) on success. The
/// hostname must have at least two dot-separated labels of 1 to 63
/// alphanumeric characters with internal hyphens.
pub fn validate_shortcut_url(input: &str) -> Result<String, FormatError> {
    if input.trim().is_empty() {
        return Err(FormatError::Empty);
    }

    let normalized = normalize_input_url(input);
    let url = Url::parse(&normalized).map_err(|e| FormatError::Unparsable(e.to_string()))?;
    let host = url.host_str().ok_or(FormatError::MissingHost)?;

    if !host.contains('.') {
        return Err(FormatError::MissingDot(host.to_string()));
    }
    if !hostname_grammar().is_match(host) {
        return Err(FormatError::InvalidHostname(host.to_string()));
    }

    Ok(normalized)
}

/// Hostname of a form input, after the same normalization as
/// [`validate_shortcut_url`]. `None` when the input does not parse.
pub fn extract_domain(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }
    Url::parse(&normalize_input_url(input))
        .ok()?
        .host_str()
        .map(str::to_string)
}

fn hostname_grammar() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
        )
        .expect("static regex")
    })
}
