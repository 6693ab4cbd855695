//! JSONL turn transcript.
//!
//! One line per [`ConversationEvent`]:
//!
//! ```text
//! {"seq":3,"event":"turn_emitted","at":"2026-10-16T09:12:03.481Z","sender":"qa-1","delivery":{...}}
//! ```
//!
//! The file is opened in append mode, so consecutive runs against the same
//! path build one transcript. `seq` restarts at 1 with every run; a
//! `session_started` line marks the boundary. The sender announced by
//! `session_started` is stamped on every later line that lacks one, so each
//! line can be attributed to a conversation on its own.

use rasa_bridge_application::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, events,
};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

struct Transcript {
    out: BufWriter<File>,
    seq: u64,
    sender: Option<String>,
    /// Lines lost to write errors
    dropped: u64,
}

impl Transcript {
    fn record(&mut self, event: ConversationEvent) -> Map<String, Value> {
        self.seq += 1;

        let mut record = Map::new();
        record.insert("seq".to_string(), Value::from(self.seq));
        record.insert("event".to_string(), Value::from(event.event_type));
        record.insert(
            "at".to_string(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );

        match event.payload {
            Value::Object(fields) => {
                if event.event_type == events::SESSION_STARTED
                    && let Some(sender) = fields.get("sender").and_then(Value::as_str)
                {
                    self.sender = Some(sender.to_string());
                }
                record.extend(fields);
            }
            Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }

        if let Some(sender) = &self.sender {
            record
                .entry("sender")
                .or_insert_with(|| Value::from(sender.as_str()));
        }
        record
    }

    fn write(&mut self, record: &Map<String, Value>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        // Every line reaches disk, so an interrupted run keeps its transcript
        self.out.flush()
    }
}

/// Appends turn transcript events to a JSONL file.
pub struct JsonlConversationLogger {
    path: PathBuf,
    transcript: Mutex<Transcript>,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Appending transcript to {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            transcript: Mutex::new(Transcript {
                out: BufWriter::new(file),
                seq: 0,
                sender: None,
                dropped: 0,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events that could not be written.
    pub fn dropped(&self) -> u64 {
        self.transcript
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .dropped
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let mut transcript = self.transcript.lock().unwrap_or_else(|e| e.into_inner());
        let record = transcript.record(event);
        if let Err(e) = transcript.write(&record) {
            transcript.dropped += 1;
            // Warn on the first loss only; the count is reported on drop
            if transcript.dropped == 1 {
                warn!(
                    "Transcript {}: failed to write event {}: {}",
                    self.path.display(),
                    record.get("seq").unwrap_or(&serde_json::Value::Null),
                    e
                );
            }
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let transcript = self
            .transcript
            .get_mut()
            .unwrap_or_else(|e| e.into_inner());
        if let Err(e) = transcript.out.flush() {
            warn!("Transcript {}: final flush failed: {}", self.path.display(), e);
        }
        if transcript.dropped > 0 {
            warn!(
                "Transcript {} is missing {} event(s)",
                self.path.display(),
                transcript.dropped
            );
        }
    }
}
