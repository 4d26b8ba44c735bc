//! HTTP licensing client.

use crate::api::{parse_license_body, LicenseAction, LicenseApi, LicenseApiResponse};
use crate::{LicenseError, LicenseResult};
use async_trait::async_trait;
use shortcut_config_and_utils::Config;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use url::Url;

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Licensing server client over `reqwest`.
#[derive(Clone)]
pub struct HttpLicenseClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl HttpLicenseClient {
    /// Create a client for `endpoint` (base URL plus path, no query).
    pub fn new(endpoint: Url, timeout: Duration) -> LicenseResult<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn from_config(config: &Config) -> LicenseResult<Self> {
        Self::new(config.license_api_url()?, config.license_request_timeout())
    }

    /// Full request URL for one call.
    pub fn request_url(&self, action: LicenseAction, license_key: &str, instance_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", action.as_str())
            .append_pair("license_key", license_key)
            .append_pair("instance", instance_id);
        url
    }
}

#[async_trait]
impl LicenseApi for HttpLicenseClient {
    async fn request(
        &self,
        action: LicenseAction,
        license_key: &str,
        instance_id: &str,
    ) -> LicenseResult<LicenseApiResponse> {
        if license_key.trim().is_empty() {
            return Err(LicenseError::MissingLicenseKey);
        }

        let url = self.request_url(action, license_key, instance_id);
        tracing::debug!(action = action.as_str(), host = ?url.host_str(), "Calling licensing API");

        let response = self
            .http_client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            tracing::error!(status = %status, body_summary = %body_summary, action = action.as_str(), "Licensing API request failed");
            return Err(LicenseError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed = parse_license_body(&body);
        if let Err(ref e) = parsed {
            tracing::error!(error = %e, body_summary = %summarize_response_body(&body), "Unreadable licensing API response");
        }
        parsed
    }
}
