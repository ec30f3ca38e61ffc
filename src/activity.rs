//! Append-only activity log (JSON lines)

use crate::error::SalesboardResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: String,
    pub detail: String,
}

impl ActivityEntry {
    pub fn new(user: &str, action: &str, detail: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.to_string(),
            action: action.to_string(),
            detail: detail.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
    user: String,
}

impl ActivityLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            user: current_user(),
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry; the file is created on first write
    pub fn record(&self, action: &str, detail: &str) -> SalesboardResult<()> {
        let entry = ActivityEntry::new(&self.user, action, detail);
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
