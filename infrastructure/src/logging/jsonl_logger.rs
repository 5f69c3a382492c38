//! JSONL file writer for debate events.
//!
//! Each [`DebateEvent`] is serialized as a single JSON line carrying its
//! `type` tag plus a `timestamp`, appended to the file via a buffered writer.

use parliament_application::EventSink;
use parliament_domain::DebateEvent;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Debate event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlEventSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &DebateEvent) -> Option<String> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut value = match serde_json::to_value(event) {
            Ok(v) => v,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event.kind(), e);
                return None;
            }
        };
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
        }
        serde_json::to_string(&value).ok()
    }
}

impl EventSink for JsonlEventSink {
    fn emit(&self, event: &DebateEvent) {
        let Some(line) = Self::record(event) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line) {
                warn!("Could not write event log {}: {}", self.path.display(), e);
                return;
            }
            // Flush every line: a crashed debate still leaves a readable log
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
