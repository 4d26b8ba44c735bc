//! Single-writer queue for license operations.

use crate::api::{LicenseAction, LicenseApiResponse};
use crate::manager::{DeactivationOutcome, LicenseManager, RefreshOutcome};
use crate::{LicenseError, LicenseResult, PremiumStatus};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

const DEFAULT_QUEUE_CAPACITY: usize = 64;

enum LicenseCommand {
    Activate {
        license_key: String,
        reply: oneshot::Sender<LicenseResult<LicenseApiResponse>>,
    },
    Refresh {
        license_key: Option<String>,
        reply: oneshot::Sender<LicenseResult<RefreshOutcome>>,
    },
    Deactivate {
        license_key: Option<String>,
        reply: oneshot::Sender<LicenseResult<DeactivationOutcome>>,
    },
    Info {
        reply: oneshot::Sender<PremiumStatus>,
    },
    ApiRequest {
        action: LicenseAction,
        license_key: String,
        reply: oneshot::Sender<LicenseResult<LicenseApiResponse>>,
    },
}

/// Cloneable handle to the license worker.
///
/// Every operation, reads included, runs to completion on one worker task
/// before the next one starts, so status writes never interleave.
#[derive(Clone)]
pub struct LicenseHandle {
    sender: mpsc::Sender<LicenseCommand>,
}

impl LicenseHandle {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(manager: LicenseManager) -> Self {
        let (sender, mut receiver) = mpsc::channel(DEFAULT_QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(command) = receiver.recv().await {
                run(&manager, command).await;
            }
            debug!("license worker stopped");
        });

        Self { sender }
    }

    pub async fn activate(&self, license_key: impl Into<String>) -> LicenseResult<LicenseApiResponse> {
        let license_key = license_key.into();
        self.call(|reply| LicenseCommand::Activate { license_key, reply })
            .await?
    }

    pub async fn refresh(&self, license_key: Option<String>) -> LicenseResult<RefreshOutcome> {
        self.call(|reply| LicenseCommand::Refresh { license_key, reply })
            .await?
    }

    pub async fn deactivate(&self, license_key: Option<String>) -> LicenseResult<DeactivationOutcome> {
        self.call(|reply| LicenseCommand::Deactivate { license_key, reply })
            .await?
    }

    pub async fn info(&self) -> LicenseResult<PremiumStatus> {
        self.call(|reply| LicenseCommand::Info { reply }).await
    }

    pub async fn api_request(
        &self,
        action: LicenseAction,
        license_key: impl Into<String>,
    ) -> LicenseResult<LicenseApiResponse> {
        let license_key = license_key.into();
        self.call(|reply| LicenseCommand::ApiRequest {
            action,
            license_key,
            reply,
        })
        .await?
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> LicenseCommand,
    ) -> LicenseResult<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(build(reply))
            .await
            .map_err(|_| LicenseError::WorkerUnavailable)?;
        response.await.map_err(|_| LicenseError::WorkerUnavailable)
    }
}

async fn run(manager: &LicenseManager, command: LicenseCommand) {
    // A dropped receiver means the caller went away; the operation still
    // completed.
    match command {
        LicenseCommand::Activate { license_key, reply } => {
            let _ = reply.send(manager.activate(&license_key).await);
        }
        LicenseCommand::Refresh { license_key, reply } => {
            let _ = reply.send(manager.refresh(license_key.as_deref()).await);
        }
        LicenseCommand::Deactivate { license_key, reply } => {
            let _ = reply.send(manager.deactivate(license_key.as_deref()).await);
        }
        LicenseCommand::Info { reply } => {
            let _ = reply.send(manager.info().await);
        }
        LicenseCommand::ApiRequest {
            action,
            license_key,
            reply,
        } => {
            let _ = reply.send(manager.api_request(action, &license_key).await);
        }
    }
}
