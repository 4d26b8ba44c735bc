//! Keyboard command dispatch.

use crate::AppState;
use parking_lot::Mutex;
use serde::Serialize;
use shortcut_catalog::OPEN_OPTIONS_COMMAND;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url_guard::{RejectionReason, SafetyVerdict};

/// Drops commands that arrive within `window` of the last accepted one.
pub struct CommandCooldown {
    window: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl CommandCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accept the command at `now` unless still cooling down.
    pub fn try_accept(&self, now: Instant) -> bool {
        let mut last = self.last_accepted.lock();
        if let Some(previous) = *last {
            if now.saturating_duration_since(previous) < self.window {
                return false;
            }
        }
        *last = Some(now);
        true
    }

    pub fn reset(&self) {
        *self.last_accepted.lock() = None;
    }
}

/// Where a shortcut was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    ActiveTab(u64),
    NewTab,
}

/// What a keyboard command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Arrived during the cooldown window; ignored.
    Throttled,
    OpenedOptions,
    /// No shortcut bound to the command.
    NoShortcut,
    /// The bound URL failed the safety gate; nothing was opened.
    Blocked { reason: RejectionReason },
    Navigated { url: String, target: NavigationTarget },
    Failed { message: String },
}

/// Turns keyboard commands into navigations.
pub struct CommandDispatcher {
    state: AppState,
    cooldown: CommandCooldown,
}

impl CommandDispatcher {
    pub fn new(state: AppState) -> Self {
        let cooldown = CommandCooldown::new(state.config.command_cooldown());
        Self { state, cooldown }
    }

    pub async fn handle_command(&self, command: &str) -> CommandOutcome {
        self.handle_command_at(command, Instant::now()).await
    }

    pub async fn handle_command_at(&self, command: &str, now: Instant) -> CommandOutcome {
        if !self.cooldown.try_accept(now) {
            debug!(command, "command ignored during cooldown");
            return CommandOutcome::Throttled;
        }

        if command == OPEN_OPTIONS_COMMAND {
            return match self.state.navigator.open_options_page().await {
                Ok(()) => CommandOutcome::OpenedOptions,
                Err(e) => failed(command, e.to_string()),
            };
        }

        let shortcut = match self.state.catalog.find_by_command(command) {
            Ok(Some(shortcut)) if !shortcut.url.is_empty() => shortcut,
            Ok(_) => {
                debug!(command, "no shortcut bound to command");
                return CommandOutcome::NoShortcut;
            }
            Err(e) => return failed(command, e.to_string()),
        };

        if let SafetyVerdict::Rejected(reason) = self.state.gate.check(&shortcut.url) {
            warn!(command, rule = reason.as_str(), "shortcut blocked by safety gate");
            return CommandOutcome::Blocked { reason };
        }

        let url = self.state.sanitizer.sanitize(&shortcut.url);
        let navigator = &self.state.navigator;
        let (result, target) = match navigator.active_tab().await {
            Some(tab) => (
                navigator.update_tab(tab, &url).await,
                NavigationTarget::ActiveTab(tab),
            ),
            None => (navigator.open_tab(&url).await, NavigationTarget::NewTab),
        };

        match result {
            Ok(()) => {
                info!(command, ?target, "shortcut opened");
                CommandOutcome::Navigated { url, target }
            }
            Err(e) => failed(command, e.to_string()),
        }
    }

    /// Forget the cooldown state.
    pub fn reset(&self) {
        self.cooldown.reset();
    }
}

fn failed(command: &str, message: String) -> CommandOutcome {
    error!(command, error = %message, "command failed");
    CommandOutcome::Failed { message }
}
