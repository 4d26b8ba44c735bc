//! License operations.

use crate::api::{LicenseAction, LicenseApi, LicenseApiResponse, LicenseData};
use crate::{LicenseError, LicenseResult, PremiumStatus, StatusRepository};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::task;
use tracing::{error, info, warn};

const DEFAULT_ACTIVATION_FAILURE: &str = "License verification failed";
const DEFAULT_VALIDATION_FAILURE: &str = "License is no longer valid";

/// Result of a refresh: what the server said and the record now stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub api_response: LicenseApiResponse,
    pub premium_status: PremiumStatus,
}

/// Result of a deactivation. The local record is always gone afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivationOutcome {
    pub api_response: LicenseApiResponse,
    pub local_deactivation: bool,
}

/// Runs license operations against the server and the status record.
///
/// Not synchronized; wrap in [`crate::LicenseHandle`] to serialize callers.
pub struct LicenseManager {
    api: Arc<dyn LicenseApi>,
    repository: StatusRepository,
    instance_id: String,
}

impl LicenseManager {
    pub fn new(
        api: Arc<dyn LicenseApi>,
        repository: StatusRepository,
        instance_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            repository,
            instance_id: instance_id.into(),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Activate `license_key` on this instance.
    ///
    /// A refusal from the server is recorded as an inactive status and
    /// returned as [`LicenseError::Rejected`]. Transport and parse failures
    /// leave the stored record untouched.
    pub async fn activate(&self, license_key: &str) -> LicenseResult<LicenseApiResponse> {
        let license_key = require_key(Some(license_key))?;
        let response = self
            .api
            .request(LicenseAction::Activate, &license_key, &self.instance_id)
            .await?;
        let now = Utc::now();

        if response.success {
            let data = response.data.clone().unwrap_or_default();
            let status = PremiumStatus {
                active: true,
                license_key: Some(license_key),
                activated_on: Some(now),
                expires_on: expiry_of(&data),
                last_verified: Some(now),
                times_activated: Some(data.times_activated.unwrap_or(0)),
                times_activated_max: Some(data.times_activated_max.unwrap_or(1)),
                remaining_activations: Some(data.remaining_activations.unwrap_or(1)),
                raw_response: response
                    .data
                    .as_ref()
                    .and_then(|d| serde_json::to_value(d).ok()),
                ..Default::default()
            };
            self.write_status(status).await?;
            info!("license activated");
            Ok(response)
        } else {
            let message = failure_message(&response, DEFAULT_ACTIVATION_FAILURE);
            let status = PremiumStatus {
                active: false,
                license_key: Some(license_key),
                activation_attempted: Some(now),
                reason: Some(message.clone()),
                ..Default::default()
            };
            self.write_status(status).await?;
            warn!(reason = %message, "license activation rejected");
            Err(LicenseError::Rejected(message))
        }
    }

    /// Re-validate a license. `license_key` defaults to the stored one.
    ///
    /// The stored `activatedOn` survives a successful refresh. A refusal
    /// records an inactive status with `deactivatedOn`.
    pub async fn refresh(&self, license_key: Option<&str>) -> LicenseResult<RefreshOutcome> {
        let current = self.read_status().await;
        let license_key = require_key(non_empty(license_key).or(current.license_key.as_deref()))?;

        let response = self
            .api
            .request(LicenseAction::Validate, &license_key, &self.instance_id)
            .await?;
        let now = Utc::now();

        let status = if response.success {
            let data = response.data.clone().unwrap_or_default();
            PremiumStatus {
                active: true,
                license_key: Some(license_key),
                activated_on: Some(current.activated_on.unwrap_or(now)),
                expires_on: expiry_of(&data),
                last_verified: Some(now),
                times_activated: Some(data.times_activated.unwrap_or(1)),
                times_activated_max: data.times_activated_max,
                remaining_activations: data.remaining_activations,
                ..Default::default()
            }
        } else {
            let message = failure_message(&response, DEFAULT_VALIDATION_FAILURE);
            warn!(reason = %message, "license no longer valid");
            PremiumStatus {
                active: false,
                license_key: Some(license_key),
                deactivated_on: Some(now),
                reason: Some(message),
                ..Default::default()
            }
        };

        let active = status.active;
        self.write_status(status).await?;
        info!(active, "license refreshed");

        Ok(RefreshOutcome {
            api_response: response,
            premium_status: self.read_status().await,
        })
    }

    /// Deactivate a license. `license_key` defaults to the stored one.
    ///
    /// The local record is cleared even when the server call fails; the
    /// failure is reported in the outcome instead of as an error.
    pub async fn deactivate(&self, license_key: Option<&str>) -> LicenseResult<DeactivationOutcome> {
        let key = match non_empty(license_key) {
            Some(key) => Some(key.to_string()),
            None => self.read_status().await.license_key,
        };

        let api_response = match require_key(key.as_deref()) {
            Ok(key) => self
                .api
                .request(LicenseAction::Deactivate, &key, &self.instance_id)
                .await
                .unwrap_or_else(|e| {
                    warn!(error = %e, "license deactivation request failed; clearing locally");
                    LicenseApiResponse::failure(e.to_string())
                }),
            Err(e) => LicenseApiResponse::failure(e.to_string()),
        };

        self.clear_status().await?;
        info!(remote_success = api_response.success, "license deactivated locally");

        Ok(DeactivationOutcome {
            api_response,
            local_deactivation: true,
        })
    }

    /// Current stored record.
    pub async fn info(&self) -> PremiumStatus {
        self.read_status().await
    }

    /// Pass-through call that does not touch the stored record.
    pub async fn api_request(
        &self,
        action: LicenseAction,
        license_key: &str,
    ) -> LicenseResult<LicenseApiResponse> {
        let license_key = require_key(Some(license_key))?;
        self.api
            .request(action, &license_key, &self.instance_id)
            .await
    }

    // Repository calls derive a key and do synchronous store I/O. They run
    // on the blocking pool, never on a runtime worker.

    async fn read_status(&self) -> PremiumStatus {
        let repository = self.repository.clone();
        task::spawn_blocking(move || repository.read_status())
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "premium status read task failed; assuming inactive");
                PremiumStatus::default()
            })
    }

    async fn write_status(&self, status: PremiumStatus) -> LicenseResult<()> {
        let repository = self.repository.clone();
        task::spawn_blocking(move || repository.write_status(&status))
            .await
            .map_err(|e| LicenseError::Task(e.to_string()))?
    }

    async fn clear_status(&self) -> LicenseResult<()> {
        let repository = self.repository.clone();
        task::spawn_blocking(move || repository.clear_status())
            .await
            .map_err(|e| LicenseError::Task(e.to_string()))??;
        Ok(())
    }
}

fn require_key(key: Option<&str>) -> LicenseResult<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or(LicenseError::MissingLicenseKey)
}

fn non_empty(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.trim().is_empty())
}

fn failure_message(response: &LicenseApiResponse, default: &str) -> String {
    response
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn expiry_of(data: &LicenseData) -> Option<String> {
    data.expires_at
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}
