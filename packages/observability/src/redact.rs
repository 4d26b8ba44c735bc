/// Written in place of a sensitive field value.
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: &[&str] = &[
    "license_key",
    "licensekey",
    "key_material",
    "secret",
    "password",
    "token",
    "authorization",
    "plaintext",
];

/// Whether a field's value must not reach the log file. Matching is
/// case-insensitive on a substring of the field name.
pub fn is_sensitive_field(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| name.contains(marker))
}
