//! End-to-end service scenarios over in-memory stores and a scripted
//! licensing server.

use async_trait::async_trait;
use license_engine::{
    LicenseAction, LicenseApi, LicenseApiResponse, LicenseData, LicenseError, LicenseResult,
};
use parking_lot::Mutex;
use serde_json::json;
use shortcut_catalog::{CatalogError, Shortcut, ShortcutDraft, ShortcutQuota};
use shortcut_config_and_utils::Config;
use shortcut_daemon::{
    handle_message, AppState, CommandDispatcher, CommandOutcome, NavigationEvent,
    NavigationTarget, RecordingNavigator,
};
use shortcut_storage::{JsonStoreExt, KeyValueStore, MemoryStore, StorageKeys};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url_guard::RejectionReason;

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Default)]
struct ScriptedApi {
    responses: Mutex<VecDeque<LicenseApiResponse>>,
}

impl ScriptedApi {
    fn push(&self, response: LicenseApiResponse) {
        self.responses.lock().push_back(response);
    }
}

#[async_trait]
impl LicenseApi for ScriptedApi {
    async fn request(
        &self,
        _action: LicenseAction,
        _license_key: &str,
        _instance_id: &str,
    ) -> LicenseResult<LicenseApiResponse> {
        self.responses
            .lock()
            .pop_front()
            .ok_or(LicenseError::Status(503))
    }
}

struct Service {
    state: AppState,
    api: Arc<ScriptedApi>,
    synced: Arc<MemoryStore>,
    navigator: Arc<RecordingNavigator>,
}

fn service(active_tab: Option<u64>) -> Service {
    let api = Arc::new(ScriptedApi::default());
    let local = Arc::new(MemoryStore::new());
    let synced = Arc::new(MemoryStore::new());
    let navigator = Arc::new(RecordingNavigator::new(active_tab));

    let state = AppState::with_parts(
        Config::default(),
        local,
        synced.clone(),
        api.clone(),
        navigator.clone(),
    )
    .unwrap();

    Service {
        state,
        api,
        synced,
        navigator,
    }
}

fn activation(expires_at: &str) -> LicenseApiResponse {
    LicenseApiResponse {
        success: true,
        message: None,
        data: Some(LicenseData {
            expires_at: Some(expires_at.to_string()),
            times_activated: Some(1),
            times_activated_max: Some(3),
            remaining_activations: Some(2),
            ..Default::default()
        }),
    }
}

async fn add(svc: &Service, title: &str, url: &str, command: &str) -> Shortcut {
    let quota = svc.state.quota().await.unwrap();
    svc.state
        .catalog
        .add(&ShortcutDraft::new(title, url).with_command(command), quota)
        .unwrap()
}

// =============================================================================
// Quota and licensing
// =============================================================================

#[tokio::test]
async fn activation_lifts_and_deactivation_restores_domain_quota() {
    let svc = service(None);
    for (i, command) in ["shortcut-01", "shortcut-02", "shortcut-03"].iter().enumerate() {
        add(&svc, &format!("D{}", i), &format!("d.com/{}", i), command).await;
    }

    assert_eq!(svc.state.quota().await.unwrap(), ShortcutQuota::Limited(3));
    let fourth = ShortcutDraft::new("D3", "d.com/3");
    let err = svc
        .state
        .catalog
        .add(&fourth, svc.state.quota().await.unwrap())
        .unwrap_err();
    assert!(matches!(err, CatalogError::QuotaExceeded { limit: 3, .. }));
    assert_eq!(
        err.to_string(),
        "Maximum limit of 3 shortcuts per domain (d.com) reached."
    );

    // Another domain is unaffected.
    add(&svc, "E", "e.com", "shortcut-04").await;

    svc.api.push(activation("2099-12-31"));
    svc.state.license.activate("KEY-1").await.unwrap();
    assert_eq!(svc.state.quota().await.unwrap(), ShortcutQuota::Unlimited);
    svc.state
        .catalog
        .add(&fourth, svc.state.quota().await.unwrap())
        .unwrap();

    svc.api.push(LicenseApiResponse {
        success: true,
        ..Default::default()
    });
    let outcome = svc.state.license.deactivate(None).await.unwrap();
    assert!(outcome.local_deactivation);
    assert_eq!(svc.state.quota().await.unwrap(), ShortcutQuota::Limited(3));
    assert!(!svc.synced.has(StorageKeys::ENCRYPTED_PREMIUM_STATUS).unwrap());
}

#[tokio::test]
async fn expired_license_keeps_free_quota() {
    let svc = service(None);
    svc.api.push(activation("2000-01-01"));
    svc.state.license.activate("KEY-1").await.unwrap();

    let status = svc.state.license.info().await.unwrap();
    assert!(status.active);
    assert_eq!(svc.state.quota().await.unwrap(), ShortcutQuota::Limited(3));
}

#[tokio::test]
async fn status_is_stored_encrypted() {
    let svc = service(None);
    svc.api.push(activation("2099-12-31"));
    svc.state.license.activate("SECRET-KEY").await.unwrap();

    let blob = svc
        .synced
        .get(StorageKeys::ENCRYPTED_PREMIUM_STATUS)
        .unwrap()
        .unwrap();
    assert!(!blob.contains("SECRET-KEY"));
    assert!(!blob.contains("2099"));
}

// =============================================================================
// Keyboard commands
// =============================================================================

#[tokio::test]
async fn command_updates_active_tab() {
    let svc = service(Some(42));
    add(&svc, "Mail", "mail.example.com/inbox", "shortcut-01").await;
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    let outcome = dispatcher.handle_command("shortcut-01").await;
    assert_eq!(
        outcome,
        CommandOutcome::Navigated {
            url: "https://mail.example.com/inbox".into(),
            target: NavigationTarget::ActiveTab(42),
        }
    );
    assert_eq!(
        svc.navigator.events(),
        vec![NavigationEvent::UpdateTab {
            tab_id: 42,
            url: "https://mail.example.com/inbox".into()
        }]
    );
}

#[tokio::test]
async fn command_opens_new_tab_without_active_tab() {
    let svc = service(None);
    add(&svc, "Docs", "docs.rs", "shortcut-02").await;
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    let outcome = dispatcher.handle_command("shortcut-02").await;
    assert!(matches!(
        outcome,
        CommandOutcome::Navigated {
            target: NavigationTarget::NewTab,
            ..
        }
    ));
    assert_eq!(
        svc.navigator.events(),
        vec![NavigationEvent::OpenTab {
            url: "https://docs.rs/".into()
        }]
    );
}

#[tokio::test]
async fn navigation_drops_fragment() {
    let svc = service(Some(1));
    add(&svc, "Page", "https://a.com/page#section", "shortcut-01").await;
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    dispatcher.handle_command("shortcut-01").await;
    assert_eq!(
        svc.navigator.events(),
        vec![NavigationEvent::UpdateTab {
            tab_id: 1,
            url: "https://a.com/page".into()
        }]
    );
}

#[tokio::test]
async fn catalog_refuses_urls_the_gate_would_block() {
    let svc = service(Some(1));
    let quota = svc.state.quota().await.unwrap();
    let err = svc
        .state
        .catalog
        .add(
            &ShortcutDraft::new("Login", "secure-login.example.com").with_command("shortcut-01"),
            quota,
        )
        .unwrap_err();

    assert!(matches!(err, CatalogError::Unsafe(RejectionReason::Blocklisted)));
    assert_eq!(
        err.to_string(),
        "URL contains suspicious patterns or is improperly formatted"
    );
    assert!(svc.state.catalog.list().unwrap().is_empty());
    assert!(svc.synced.get(StorageKeys::CUSTOM_SHORTCUTS).unwrap().is_none());
}

#[tokio::test]
async fn blocked_shortcut_never_navigates() {
    let svc = service(Some(1));
    let shortcut = Shortcut {
        command: "shortcut-01".into(),
        title: "Bad".into(),
        url: "https://phishing.example.com".into(),
        domains: vec!["phishing.example.com".into()],
        shortcut_key: String::new(),
    };
    svc.synced
        .set_json(StorageKeys::CUSTOM_SHORTCUTS, &vec![shortcut])
        .unwrap();
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    let outcome = dispatcher.handle_command("shortcut-01").await;
    assert_eq!(
        outcome,
        CommandOutcome::Blocked {
            reason: RejectionReason::Blocklisted
        }
    );
    assert!(svc.navigator.events().is_empty());
}

#[tokio::test]
async fn tampered_synced_url_is_blocked() {
    let svc = service(Some(1));
    let shortcut = Shortcut {
        command: "shortcut-03".into(),
        title: "Script".into(),
        url: "javascript:alert(1)".into(),
        domains: Vec::new(),
        shortcut_key: String::new(),
    };
    svc.synced
        .set_json(StorageKeys::CUSTOM_SHORTCUTS, &vec![shortcut])
        .unwrap();
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    let outcome = dispatcher.handle_command("shortcut-03").await;
    assert_eq!(
        outcome,
        CommandOutcome::Blocked {
            reason: RejectionReason::DisallowedScheme
        }
    );
    assert!(svc.navigator.events().is_empty());
}

#[tokio::test]
async fn unbound_command_does_nothing() {
    let svc = service(Some(1));
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    assert_eq!(
        dispatcher.handle_command("shortcut-09").await,
        CommandOutcome::NoShortcut
    );
    assert!(svc.navigator.events().is_empty());
}

#[tokio::test]
async fn open_custom_url_opens_options_page() {
    let svc = service(Some(1));
    let dispatcher = CommandDispatcher::new(svc.state.clone());

    assert_eq!(
        dispatcher.handle_command("open-custom-url").await,
        CommandOutcome::OpenedOptions
    );
    assert_eq!(svc.navigator.events(), vec![NavigationEvent::OpenOptionsPage]);
}

#[tokio::test]
async fn commands_inside_cooldown_are_dropped() {
    let svc = service(Some(1));
    add(&svc, "A", "a.com", "shortcut-01").await;
    let dispatcher = CommandDispatcher::new(svc.state.clone());
    let start = Instant::now();

    assert!(matches!(
        dispatcher.handle_command_at("shortcut-01", start).await,
        CommandOutcome::Navigated { .. }
    ));
    assert_eq!(
        dispatcher
            .handle_command_at("shortcut-01", start + Duration::from_millis(500))
            .await,
        CommandOutcome::Throttled
    );
    // The options command is throttled too.
    assert_eq!(
        dispatcher
            .handle_command_at("open-custom-url", start + Duration::from_millis(900))
            .await,
        CommandOutcome::Throttled
    );
    assert!(matches!(
        dispatcher
            .handle_command_at("shortcut-01", start + Duration::from_millis(1000))
            .await,
        CommandOutcome::Navigated { .. }
    ));
    assert_eq!(svc.navigator.events().len(), 2);
}

// =============================================================================
// Messages
// =============================================================================

#[tokio::test]
async fn malformed_messages_are_rejected() {
    let svc = service(None);

    let response = handle_message(&svc.state, &json!("getShortcuts")).await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Invalid message format"));

    let response = handle_message(&svc.state, &json!({"url": "a.com"})).await;
    assert_eq!(response.error.as_deref(), Some("Invalid message format"));

    let response = handle_message(&svc.state, &json!({"action": "formatDisk"})).await;
    assert_eq!(response.error.as_deref(), Some("Unknown action type"));
    assert!(response
        .supported_actions
        .unwrap()
        .contains(&"getShortcuts".to_string()));
}

#[tokio::test]
async fn get_shortcuts_returns_stored_list() {
    let svc = service(None);
    let response = handle_message(&svc.state, &json!({"action": "getShortcuts"})).await;
    assert!(response.success);
    assert_eq!(response.shortcuts, Some(json!([])));

    add(&svc, "Mail", "mail.example.com", "shortcut-01").await;
    let response = handle_message(&svc.state, &json!({"action": "getShortcuts"})).await;
    let shortcuts = response.shortcuts.unwrap();
    assert_eq!(shortcuts[0]["title"], "Mail");
    assert_eq!(shortcuts[0]["command"], "shortcut-01");
}

#[tokio::test]
async fn validate_url_reports_gate_verdict() {
    let svc = service(None);

    let response =
        handle_message(&svc.state, &json!({"action": "validateUrl", "url": "https://example.com"}))
            .await;
    assert!(response.success);
    assert_eq!(response.is_valid, Some(true));

    let response = handle_message(
        &svc.state,
        &json!({"action": "validateUrl", "url": "http://192.168.1.1/admin"}),
    )
    .await;
    assert!(response.success);
    assert_eq!(response.is_valid, Some(false));
    assert!(!response.reason.unwrap().is_empty());

    let response = handle_message(&svc.state, &json!({"action": "validateUrl", "url": ""})).await;
    assert!(!response.success);
    assert_eq!(response.is_valid, Some(false));
}

#[tokio::test]
async fn license_messages_go_through_worker() {
    let svc = service(None);

    let response = handle_message(&svc.state, &json!({"action": "getLicenseInfo"})).await;
    assert!(response.success);
    assert_eq!(response.data.unwrap()["active"], false);

    svc.api.push(activation("2099-12-31"));
    let response = handle_message(
        &svc.state,
        &json!({"action": "verifyLicenseKey", "licenseKey": "KEY-1"}),
    )
    .await;
    assert!(response.success);
    assert_eq!(response.data.unwrap()["success"], true);

    let response = handle_message(&svc.state, &json!({"action": "getLicenseInfo"})).await;
    let data = response.data.unwrap();
    assert_eq!(data["active"], true);
    assert_eq!(data["licenseKey"], "KEY-1");

    let response = handle_message(
        &svc.state,
        &json!({"action": "verifyLicenseKey", "licenseKey": ""}),
    )
    .await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("A license key is required"));
}

#[tokio::test]
async fn license_api_request_requires_known_action() {
    let svc = service(None);

    let response = handle_message(
        &svc.state,
        &json!({"action": "licenseApiRequest", "endpoint": "?action=upgrade", "licenseKey": "K"}),
    )
    .await;
    assert_eq!(response.error.as_deref(), Some("Invalid license action"));

    svc.api.push(activation("2099-12-31"));
    let response = handle_message(
        &svc.state,
        &json!({"action": "licenseApiRequest", "endpoint": "?action=validate", "licenseKey": "K"}),
    )
    .await;
    assert!(response.success);
    // A raw request does not touch the stored status.
    assert!(!svc.state.license.info().await.unwrap().active);
}

#[tokio::test]
async fn open_options_message_navigates() {
    let svc = service(None);
    let response = handle_message(&svc.state, &json!({"action": "openOptions"})).await;
    assert!(response.success);
    assert_eq!(svc.navigator.events(), vec![NavigationEvent::OpenOptionsPage]);
}

#[tokio::test]
async fn hidden_domains_round_trip() {
    let svc = service(None);
    assert!(svc.state.panel.set_hidden("example.com", true).unwrap());
    assert!(svc.state.panel.is_hidden_on("example.com").unwrap());
    svc.state.panel.set_hidden("example.com", false).unwrap();
    assert!(!svc.state.panel.is_hidden_on("example.com").unwrap());
}

// =============================================================================
// File-backed state
// =============================================================================

#[tokio::test]
async fn file_backed_state_survives_restart() {
    use shortcut_config_and_utils::Paths;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let paths = Paths::with_base_dir(dir.path().to_path_buf());

    let first = AppState::build(
        Config::default(),
        &paths,
        Arc::new(RecordingNavigator::new(None)),
    )
    .unwrap();
    let quota = first.quota().await.unwrap();
    first
        .catalog
        .add(
            &ShortcutDraft::new("Mail", "mail.example.com").with_command("shortcut-01"),
            quota,
        )
        .unwrap();
    first.panel.set_hidden("news.example.com", true).unwrap();
    let instance_id = first.local.get(StorageKeys::INSTANCE_ID).unwrap();
    assert!(instance_id.is_some());
    drop(first);

    let second = AppState::build(
        Config::default(),
        &paths,
        Arc::new(RecordingNavigator::new(None)),
    )
    .unwrap();
    assert_eq!(second.catalog.list().unwrap().len(), 1);
    assert!(second.panel.is_hidden_on("news.example.com").unwrap());
    assert_eq!(second.local.get(StorageKeys::INSTANCE_ID).unwrap(), instance_id);
    assert!(paths.local_store_file().exists());
    assert!(paths.sync_store_file().exists());
}
