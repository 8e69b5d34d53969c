// src/audit.rs

//! Append-only record of delivered reports.

use std::{fmt, io, path::PathBuf, sync::Mutex as StdMutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::{models::submission::Submission, report::TrainingReport};

/// One line of the training log, written after a successful send.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub full_name: String,
    pub score: u64,
    pub total: u64,
    pub percentage: u64,
    pub duration: String,
}

impl LogRecord {
    pub fn new(timestamp: NaiveDateTime, submission: &Submission, report: &TrainingReport) -> Self {
        Self {
            timestamp,
            full_name: submission.full_name(),
            score: report.score,
            total: report.total,
            percentage: report.percentage,
            duration: report.duration.clone(),
        }
    }

    /// The record followed by a newline.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | SUCCESS | {} | Wynik: {}/{} ({}%) | Czas: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.full_name,
            self.score,
            self.total,
            self.percentage,
            self.duration
        )
    }
}

/// Log sink capability. Write-only; nothing reads the log back.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn append(&self, line: &str) -> io::Result<()>;
}

/// Appends to a flat text file, creating it on first write.
pub struct FileAuditLog {
    path: PathBuf,
    // Serializes writers within this process so lines never interleave.
    lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn append(&self, line: &str) -> io::Result<()> {
        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// Keeps lines in memory. Used by tests and by callers that inspect what was logged.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    lines: StdMutex<Vec<String>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::other("audit log lock poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}
