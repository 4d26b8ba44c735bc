//! Shared append-only log file.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// `~/.smart-shortcuts/logs/dev.jsonl`, or under the temp dir without a home.
pub(crate) fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".smart-shortcuts")
        .join("logs")
        .join("dev.jsonl")
}

/// Handle to a log file opened in append mode. Clones share one buffer,
/// flushed at every newline so concurrent processes interleave whole lines.
#[derive(Clone)]
pub struct AppendLogFile {
    file: Arc<Mutex<LineWriter<File>>>,
}

impl AppendLogFile {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(LineWriter::new(file))),
        })
    }
}

impl Write for AppendLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for AppendLogFile {
    type Writer = AppendLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
