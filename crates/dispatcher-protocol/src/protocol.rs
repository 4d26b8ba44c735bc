use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Actions accepted on the message channel.
pub const SUPPORTED_ACTIONS: [&str; 8] = [
    "getShortcuts",
    "openOptions",
    "validateUrl",
    "licenseApiRequest",
    "verifyLicenseKey",
    "refreshLicense",
    "deactivateLicense",
    "getLicenseInfo",
];

/// Reason reported by `validateUrl` for a rejected URL.
pub const UNSAFE_URL_REASON: &str = "URL contains suspicious patterns or is improperly formatted";

/// A request from a UI surface (panel, options page, popup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionRequest {
    GetShortcuts,
    OpenOptions,
    ValidateUrl {
        url: String,
    },
    /// Raw licensing call; the action is inferred from `endpoint`.
    #[serde(rename_all = "camelCase")]
    LicenseApiRequest {
        endpoint: String,
        license_key: String,
    },
    #[serde(rename_all = "camelCase")]
    VerifyLicenseKey {
        license_key: String,
    },
    #[serde(rename_all = "camelCase")]
    RefreshLicense {
        #[serde(default)]
        license_key: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    DeactivateLicense {
        #[serde(default)]
        license_key: Option<String>,
    },
    GetLicenseInfo,
}

impl ExtensionRequest {
    pub fn action(&self) -> &'static str {
        match self {
            Self::GetShortcuts => "getShortcuts",
            Self::OpenOptions => "openOptions",
            Self::ValidateUrl { .. } => "validateUrl",
            Self::LicenseApiRequest { .. } => "licenseApiRequest",
            Self::VerifyLicenseKey { .. } => "verifyLicenseKey",
            Self::RefreshLicense { .. } => "refreshLicense",
            Self::DeactivateLicense { .. } => "deactivateLicense",
            Self::GetLicenseInfo => "getLicenseInfo",
        }
    }
}

/// Request rejected before reaching a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Invalid message format")]
    InvalidFormat,
    #[error("Unknown action type")]
    UnknownAction(String),
    #[error("Invalid parameters")]
    InvalidParams(String),
}

impl ProtocolError {
    pub fn to_response(&self) -> ExtensionResponse {
        match self {
            Self::InvalidFormat => ExtensionResponse::error(self.to_string()),
            Self::UnknownAction(_) => ExtensionResponse {
                supported_actions: Some(SUPPORTED_ACTIONS.iter().map(|s| s.to_string()).collect()),
                ..ExtensionResponse::error(self.to_string())
            },
            Self::InvalidParams(details) => {
                ExtensionResponse::error_with_details(self.to_string(), details.clone())
            }
        }
    }
}

/// Parse an untyped message.
pub fn parse_request(message: &Value) -> Result<ExtensionRequest, ProtocolError> {
    let action = message
        .as_object()
        .and_then(|object| object.get("action"))
        .and_then(Value::as_str)
        .filter(|action| !action.is_empty())
        .ok_or(ProtocolError::InvalidFormat)?;

    if !SUPPORTED_ACTIONS.contains(&action) {
        return Err(ProtocolError::UnknownAction(action.to_string()));
    }

    serde_json::from_value(message.clone()).map_err(|e| ProtocolError::InvalidParams(e.to_string()))
}

/// Parse a message from its JSON text.
pub fn parse_request_str(message: &str) -> Result<ExtensionRequest, ProtocolError> {
    let value: Value = serde_json::from_str(message).map_err(|_| ProtocolError::InvalidFormat)?;
    parse_request(&value)
}

/// Reply to an [`ExtensionRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_actions: Option<Vec<String>>,
}

impl ExtensionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn shortcuts(shortcuts: Value) -> Self {
        Self {
            shortcuts: Some(shortcuts),
            ..Self::ok()
        }
    }

    /// `validateUrl` answer. The reason is empty for a safe URL.
    pub fn validation(is_valid: bool) -> Self {
        Self {
            is_valid: Some(is_valid),
            reason: Some(if is_valid { "" } else { UNSAFE_URL_REASON }.to_string()),
            ..Self::ok()
        }
    }

    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn error_with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::error(message)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
