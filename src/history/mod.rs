//! # Request History
//!
//! Every executed request, ad-hoc or from a suite, is appended as one JSON
//! line to the history file. Nothing in the run path ever reads it back; the
//! `history` command shows the most recent entries.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;
use crate::http::method::HttpMethod;
use crate::http::request::BuiltRequest;
use crate::http::response::ExecutionResult;

/// Maximum number of history entries shown at once.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// A single history entry recording a past request and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub body: Option<String>,
    pub status: Option<u16>,
    pub duration_ms: u64,
    pub size_bytes: usize,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryEntry {
    pub fn record(request: &BuiltRequest, result: &ExecutionResult) -> Self {
        Self {
            timestamp: Utc::now(),
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            status: result.status,
            duration_ms: u64::try_from(result.elapsed_ms).unwrap_or(u64::MAX),
            size_bytes: result.size_bytes,
            response: result.body.clone(),
            error: result.transport_error.clone(),
        }
    }
}

/// Most recent entries, newest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.min(MAX_HISTORY_ENTRIES),
        }
    }

    /// Add an entry to the front of the history list, evicting the oldest
    /// entry if the list exceeds the limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.limit == 0 {
            return;
        }
        if self.entries.len() >= self.limit {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Return all history entries (most recent first).
    pub fn entries(&self) -> &VecDeque<HistoryEntry> {
        &self.entries
    }
}

/// Append-only history file.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HistoryEntry) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let line = serde_json::to_string(entry).map_err(|source| StorageError::Serialize {
            what: "history entry",
            source,
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| StorageError::io(&self.path, e))
    }

    /// Record an exchange, logging instead of failing when the file cannot be written.
    pub fn record(&self, request: &BuiltRequest, result: &ExecutionResult) {
        if let Err(err) = self.append(&HistoryEntry::record(request, result)) {
            warn!(error = %err, "failed to write history entry");
        }
    }

    /// Load up to `limit` of the most recent entries. Unparseable lines are skipped.
    pub fn recent(&self, limit: usize) -> Result<History, StorageError> {
        let mut history = History::new(limit);
        if !self.path.exists() {
            return Ok(history);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        for (index, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => history.push(entry),
                Err(e) => warn!(line = index + 1, error = %e, "skipping unreadable history line"),
            }
        }
        Ok(history)
    }
}
