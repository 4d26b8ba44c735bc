//! Message handlers.

use crate::AppState;
use dispatcher_protocol::{parse_request, ExtensionRequest, ExtensionResponse};
use license_engine::LicenseAction;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Parse and answer one untyped message. Never fails; problems become error
/// responses.
pub async fn handle_message(state: &AppState, message: &Value) -> ExtensionResponse {
    match parse_request(message) {
        Ok(request) => handle_request(state, request).await,
        Err(e) => {
            warn!(error = %e, "rejected message");
            e.to_response()
        }
    }
}

pub async fn handle_request(state: &AppState, request: ExtensionRequest) -> ExtensionResponse {
    debug!(action = request.action(), "handling message");

    match request {
        ExtensionRequest::GetShortcuts => match state.catalog.list() {
            Ok(shortcuts) => match serde_json::to_value(shortcuts) {
                Ok(value) => ExtensionResponse::shortcuts(value),
                Err(e) => failure("Failed to retrieve shortcuts", e),
            },
            Err(e) => failure("Failed to retrieve shortcuts", e),
        },

        ExtensionRequest::OpenOptions => match state.navigator.open_options_page().await {
            Ok(()) => ExtensionResponse::ok(),
            Err(e) => failure("Failed to open options page", e),
        },

        ExtensionRequest::ValidateUrl { url } => {
            if url.trim().is_empty() {
                return ExtensionResponse {
                    is_valid: Some(false),
                    ..ExtensionResponse::error("No URL provided or invalid URL format")
                };
            }
            ExtensionResponse::validation(state.gate.is_safe(&url))
        }

        ExtensionRequest::LicenseApiRequest {
            endpoint,
            license_key,
        } => match LicenseAction::from_endpoint(&endpoint) {
            Some(action) => data_or_error(state.license.api_request(action, license_key).await),
            None => ExtensionResponse::error("Invalid license action"),
        },

        ExtensionRequest::VerifyLicenseKey { license_key } => {
            data_or_error(state.license.activate(license_key).await)
        }

        ExtensionRequest::RefreshLicense { license_key } => {
            data_or_error(state.license.refresh(license_key).await)
        }

        ExtensionRequest::DeactivateLicense { license_key } => {
            data_or_error(state.license.deactivate(license_key).await)
        }

        ExtensionRequest::GetLicenseInfo => data_or_error(state.license.info().await),
    }
}

fn data_or_error<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> ExtensionResponse {
    match result {
        Ok(data) => match serde_json::to_value(data) {
            Ok(value) => ExtensionResponse::data(value),
            Err(e) => ExtensionResponse::error(e.to_string()),
        },
        Err(e) => ExtensionResponse::error(e.to_string()),
    }
}

fn failure(message: &str, details: impl std::fmt::Display) -> ExtensionResponse {
    error!(error = %details, "{}", message);
    ExtensionResponse::error_with_details(message, details.to_string())
}
