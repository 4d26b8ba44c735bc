//! Licensing server contract.

use crate::{LicenseError, LicenseResult};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// Action requested from the licensing server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseAction {
    Activate,
    Validate,
    Deactivate,
}

impl LicenseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Validate => "validate",
            Self::Deactivate => "deactivate",
        }
    }

    /// Infer the action from a free-form endpoint string such as
    /// `?action=deactivate`.
    pub fn from_endpoint(endpoint: &str) -> Option<Self> {
        // "deactivate" contains "activate"; check it first.
        if endpoint.contains("deactivate") {
            Some(Self::Deactivate)
        } else if endpoint.contains("activate") {
            Some(Self::Activate)
        } else if endpoint.contains("validate") {
            Some(Self::Validate)
        } else {
            None
        }
    }
}

/// Response body of the licensing server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LicenseData>,
}

impl LicenseApiResponse {
    /// Failure response carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// License details on a successful response.
///
/// Counts are accepted as numbers or numeric strings; anything else is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub times_activated: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub times_activated_max: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub remaining_activations: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Licensing server client.
#[async_trait]
pub trait LicenseApi: Send + Sync {
    /// Perform one request. No retries.
    async fn request(
        &self,
        action: LicenseAction,
        license_key: &str,
        instance_id: &str,
    ) -> LicenseResult<LicenseApiResponse>;
}

/// Parse a licensing server body.
///
/// The server sometimes prefixes its JSON with PHP warning markup; in that
/// case the `{...}` span of the first line that has one is parsed instead.
pub fn parse_license_body(body: &str) -> LicenseResult<LicenseApiResponse> {
    let json = if body.contains("<b>Warning</b>") || body.contains("<br />") {
        embedded_json()
            .find(body)
            .map(|m| m.as_str())
            .ok_or_else(|| {
                LicenseError::Parse("Server returned HTML error with no valid JSON".to_string())
            })?
    } else {
        body
    };

    serde_json::from_str(json).map_err(|e| LicenseError::Parse(e.to_string()))
}

fn embedded_json() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{.*\}").expect("static regex"))
}
