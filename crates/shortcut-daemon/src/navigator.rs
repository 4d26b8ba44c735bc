//! Browser tab seam.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Browser tab identifier.
pub type TabId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("navigation failed: {0}")]
pub struct NavigationError(pub String);

/// Operations the service needs from the browser.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Active tab of the current window, if any.
    async fn active_tab(&self) -> Option<TabId>;

    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), NavigationError>;

    async fn open_tab(&self, url: &str) -> Result<(), NavigationError>;

    async fn open_options_page(&self) -> Result<(), NavigationError>;
}

/// A navigation the service asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum NavigationEvent {
    #[serde(rename_all = "camelCase")]
    UpdateTab { tab_id: TabId, url: String },
    OpenTab { url: String },
    OpenOptionsPage,
}

/// Records navigations instead of performing them.
#[derive(Default)]
pub struct RecordingNavigator {
    active_tab: Mutex<Option<TabId>>,
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new(active_tab: Option<TabId>) -> Self {
        Self {
            active_tab: Mutex::new(active_tab),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn set_active_tab(&self, tab: Option<TabId>) {
        *self.active_tab.lock() = tab;
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn active_tab(&self) -> Option<TabId> {
        *self.active_tab.lock()
    }

    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), NavigationError> {
        self.events.lock().push(NavigationEvent::UpdateTab {
            tab_id: tab,
            url: url.to_string(),
        });
        Ok(())
    }

    async fn open_tab(&self, url: &str) -> Result<(), NavigationError> {
        self.events.lock().push(NavigationEvent::OpenTab {
            url: url.to_string(),
        });
        Ok(())
    }

    async fn open_options_page(&self) -> Result<(), NavigationError> {
        self.events.lock().push(NavigationEvent::OpenOptionsPage);
        Ok(())
    }
}

/// Writes each navigation as a JSON line on stdout for the host bridge.
///
/// There is no active tab, so shortcut navigations open a new tab.
#[derive(Default)]
pub struct StdoutNavigator;

impl StdoutNavigator {
    fn emit(&self, event: &NavigationEvent) -> Result<(), NavigationError> {
        let line = serde_json::to_string(event).map_err(|e| NavigationError(e.to_string()))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line).map_err(|e| NavigationError(e.to_string()))
    }
}

#[async_trait]
impl Navigator for StdoutNavigator {
    async fn active_tab(&self) -> Option<TabId> {
        None
    }

    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), NavigationError> {
        self.emit(&NavigationEvent::UpdateTab {
            tab_id: tab,
            url: url.to_string(),
        })
    }

    async fn open_tab(&self, url: &str) -> Result<(), NavigationError> {
        self.emit(&NavigationEvent::OpenTab {
            url: url.to_string(),
        })
    }

    async fn open_options_page(&self) -> Result<(), NavigationError> {
        self.emit(&NavigationEvent::OpenOptionsPage)
    }
}
