//! URL checks that run before every shortcut navigation.
//!
//! - [`SafetyGate`]: heuristic reject rules (scheme, blocklist, IP literal,
//!   subdomain depth, hostname length)
//! - [`Sanitizer`]: strips fragments and replaces anything non-navigable
//!   with a fallback page
//! - [`validate_shortcut_url`]: form-side format check for saved shortcuts
//! - [`domain_matches`]: shortcut domain patterns against a page host
//!
//! Nothing here returns an error on the navigation path; callers get a
//! verdict or a safe URL.

mod domain;
mod format;
mod gate;
mod sanitize;

pub use domain::domain_matches;
pub use format::{extract_domain, normalize_input_url, validate_shortcut_url, FormatError};
pub use gate::{RejectionReason, SafetyGate, SafetyVerdict, DEFAULT_BLOCKLIST};
pub use sanitize::Sanitizer;
