//! Premium status record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached result of the last license operation.
///
/// Serialized with camelCase field names. Only `active` is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumStatus {
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_on: Option<DateTime<Utc>>,
    /// Expiry as sent by the licensing server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_activated: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times_activated_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_activations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_attempted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<serde_json::Value>,
}

impl PremiumStatus {
    /// Whether premium features are unlocked at `now`.
    ///
    /// Requires `active`. A present expiry must parse and not be in the
    /// past; an unparsable expiry counts as expired.
    pub fn is_premium(&self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        match self.expires_on.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(raw) => parse_expiry(raw).is_some_and(|expiry| now <= expiry),
        }
    }
}

/// Parse a server expiry: RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC) or
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
