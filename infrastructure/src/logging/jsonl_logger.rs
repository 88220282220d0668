//! JSONL file writer for conversation transcripts.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line carrying
//! `timestamp`, `conversation_id`, `sequence`, `type` and `data`, appended
//! to the file via a buffered writer.

use council_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a new logger appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Open `<dir>/<conversation_id>.conversation.jsonl`.
    pub fn for_conversation(dir: impl AsRef<Path>, conversation_id: &str) -> Option<Self> {
        let file_name: String = conversation_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self::new(dir.as_ref().join(format!("{file_name}.conversation.jsonl")))
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = serde_json::json!({
            "timestamp": timestamp,
            "conversation_id": event.conversation_id,
            "sequence": event.sequence,
            "type": event.event_type,
            "data": event.payload,
        });

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // JSONL is append-only; flush each record
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ProgressEvent, SequencedEvent};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_progress_records() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::for_conversation(dir.path(), "conv-1").unwrap();
        let path = logger.path().to_path_buf();
        assert!(path.ends_with("conv-1.conversation.jsonl"));

        logger.log(ConversationEvent::from_progress(
            "conv-1",
            &SequencedEvent {
                sequence: 0,
                event: ProgressEvent::Stage1Start {},
            },
        ));
        logger.log(ConversationEvent::from_progress(
            "conv-1",
            &SequencedEvent {
                sequence: 1,
                event: ProgressEvent::TitleComplete {
                    title: Some("Sorting".into()),
                },
            },
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
            assert_eq!(record["conversation_id"], "conv-1");
        }
        assert_eq!(records[0]["type"], "stage1_start");
        assert_eq!(records[0]["sequence"], 0);
        assert_eq!(records[1]["type"], "title_complete");
        assert_eq!(records[1]["data"]["title"], "Sorting");
    }

    #[test]
    fn test_jsonl_logger_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        for sequence in 0..2 {
            let logger = JsonlConversationLogger::for_conversation(dir.path(), "conv").unwrap();
            logger.log(ConversationEvent::new(
                "conv",
                sequence,
                "complete",
                serde_json::json!({}),
            ));
        }
        let records = read_lines(&dir.path().join("conv.conversation.jsonl"));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_conversation_id_is_sanitized_into_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::for_conversation(dir.path(), "../etc/passwd").unwrap();
        assert_eq!(logger.path().parent(), Some(dir.path()));
        assert!(logger.path().ends_with("___etc_passwd.conversation.jsonl"));
    }
}
