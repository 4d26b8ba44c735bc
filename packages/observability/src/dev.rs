//! JSONL file subscriber.

use crate::writer::{default_log_path, AppendLogFile};
use crate::{JsonlLayer, LogConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

pub(crate) fn install(config: &LogConfig) {
    let log_path = config.log_path.clone().unwrap_or_else(default_log_path);

    let file_layer = match AppendLogFile::open(&log_path) {
        Ok(file) => Some(
            JsonlLayer::new(config.service_name.clone(), file)
                .with_filter(filter(&config.default_level)),
        ),
        Err(e) => {
            eprintln!("cannot open log file {}: {}", log_path.display(), e);
            None
        }
    };

    let stderr_layer = config.also_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            service = %config.service_name,
            log_path = %log_path.display(),
            "logging initialized"
        );
    }
}
