//! Logging setup for service binaries.
//!
//! JSONL goes to `<base>/logs/dev.jsonl` and a compact copy to stderr.
//! `RUST_LOG` takes precedence over the level passed in.

use crate::Paths;
use observability::LogConfig;
use tracing::Level;

pub fn init_logging(level: &str, paths: &Paths) {
    init_logging_for_service("shortcut-daemon", level, paths);
}

pub fn init_logging_for_service(service_name: &str, level: &str, paths: &Paths) {
    observability::init_with_config(
        LogConfig::for_service(service_name)
            .with_level(parse_level(level).as_str().to_ascii_lowercase())
            .with_log_path(paths.log_file())
            .with_stderr(),
    );
}

/// Level named by `level`, case-insensitive. `warning` is accepted for
/// `warn`; anything unrecognized is `INFO`.
pub fn parse_level(level: &str) -> Level {
    let level = level.trim();
    if level.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    level.parse().unwrap_or(Level::INFO)
}
