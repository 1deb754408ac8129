use std::fs::{File, OpenOptions};
use std::io::Write;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::types::StoveStatus;

/// Append-only NDJSON log of wire traffic: one line per outbound request,
/// command, or fetched snapshot. Useful when chasing firmware quirks.
pub(crate) struct MessageLog {
    file: File,
}

impl MessageLog {
    pub fn new(path: &str) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    pub fn log_request(&mut self, url: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "req",
            "url": url,
        });
        self.write_line(&entry);
    }

    pub fn log_command(&mut self, action: &str, url: &str) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "cmd",
            "action": action,
            "url": url,
        });
        self.write_line(&entry);
    }

    pub fn log_status(&mut self, status: &StoveStatus) {
        let entry = json!({
            "ts": Utc::now().to_rfc3339(),
            "dir": "status",
            "body": status,
        });
        self.write_line(&entry);
    }

    fn write_line(&mut self, entry: &Value) {
        if let Ok(line) = serde_json::to_string(entry)
            && let Err(e) = writeln!(self.file, "{line}")
        {
            warn!("failed to write log entry: {e}");
        }
    }
}
