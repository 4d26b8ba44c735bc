//! Smart Shortcuts background service.
//!
//! Wires storage, the status codec, the licensing worker, the URL guard and
//! the shortcut catalog into one [`AppState`], and exposes the two entry
//! points the browser drives: keyboard commands ([`CommandDispatcher`]) and
//! messages ([`handle_message`]).

mod app;
mod dispatcher;
mod error;
mod handlers;
mod navigator;

pub use app::AppState;
pub use dispatcher::{CommandCooldown, CommandDispatcher, CommandOutcome, NavigationTarget};
pub use error::{DaemonError, DaemonResult};
pub use handlers::{handle_message, handle_request};
pub use navigator::{
    NavigationError, NavigationEvent, Navigator, RecordingNavigator, StdoutNavigator, TabId,
};
