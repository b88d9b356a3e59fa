// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Submission history (JSON-Lines file or in-memory).
//!
//! Provides [`HistoryConfig`] for TOML configuration and [`HistoryStore`]
//! which records every delivered command and answers "most recent N" queries.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use eview_core::{DeliveryStatus, Dispatch, SinkError, SubmissionSink};

/// Records returned when the caller does not ask for a specific count.
pub const DEFAULT_QUERY_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub fn default_history_dir() -> String {
    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("eview").to_string_lossy().to_string();
    }
    "data".to_string()
}

/// History store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Persist to disk; when false history lives in memory only
    pub enabled: bool,
    /// Directory holding the history file
    pub dir: String,
    /// History filename
    pub file: String,
    /// Records returned by a history query without an explicit limit
    pub query_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_history_dir(),
            file: "history.jsonl".to_string(),
            query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl HistoryConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.dir.trim()).join(self.file.trim())
    }
}

// ---------------------------------------------------------------------------
// Records and errors
// ---------------------------------------------------------------------------

/// One logged submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: u64,
    pub device_name: String,
    pub phone_number: String,
    pub command_name: String,
    pub raw_message: String,
    pub status: DeliveryStatus,
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    fn new(id: u64, dispatch: &Dispatch, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            device_name: dispatch.device_name.clone(),
            phone_number: dispatch.phone_number.clone(),
            command_name: dispatch.command_name.clone(),
            raw_message: dispatch.raw_message.clone(),
            status: dispatch.status,
            timestamp,
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize history record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("history lock poisoned")]
    Poisoned,
}

impl HistoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        HistoryError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, HistoryError> {
    mutex.lock().map_err(|_| HistoryError::Poisoned)
}

/// Newest first (timestamp, then id), capped at `limit`.
fn newest_first(mut records: Vec<HistoryRecord>, limit: usize) -> Vec<HistoryRecord> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
    records.truncate(limit);
    records
}

/// Read access to recorded submissions.
pub trait HistoryLog {
    /// At most `limit` records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError>;
}

// ---------------------------------------------------------------------------
// JSON-Lines file store
// ---------------------------------------------------------------------------

struct JsonlState {
    next_id: u64,
    file: File,
}

/// Append-only history file, one JSON object per line.
pub struct JsonlHistory {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlHistory {
    fn open_file(path: &Path) -> Result<File, HistoryError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| HistoryError::io(path, e))?;
        Ok(file)
    }

    fn read_records(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
        let file = File::open(path).map_err(|e| HistoryError::io(path, e))?;
        let mut records = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| HistoryError::io(path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping malformed history line {} in '{}': {}",
                    idx + 1,
                    path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }

    /// Open (or create) the history file, continuing its id sequence.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let file = Self::open_file(path)?;
        let last_id = Self::read_records(path)?
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0);
        debug!("History '{}' opened, next id {}", path.display(), last_id + 1);
        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(JsonlState {
                next_id: last_id + 1,
                file,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `dispatch` stamped with `timestamp`.
    ///
    /// The line is written whole or not at all: on failure the file is cut
    /// back to its previous length and the id is not consumed.
    pub fn record(
        &self,
        dispatch: &Dispatch,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoryRecord, HistoryError> {
        let mut state = lock(&self.state)?;
        let record = HistoryRecord::new(state.next_id, dispatch, timestamp);
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let committed = state
            .file
            .metadata()
            .map_err(|e| HistoryError::io(&self.path, e))?
            .len();
        if let Err(e) = write_line(&mut state.file, &line) {
            if let Err(rollback) = state.file.set_len(committed) {
                error!(
                    "Failed to roll back history '{}' to {} bytes: {}",
                    self.path.display(),
                    committed,
                    rollback
                );
            }
            return Err(HistoryError::io(&self.path, e));
        }

        state.next_id += 1;
        Ok(record)
    }
}

fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line)?;
    file.flush()
}

impl HistoryLog for JsonlHistory {
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        // Hold the writer lock so a concurrent append is never read half-written.
        let _state = lock(&self.state)?;
        Ok(newest_first(Self::read_records(&self.path)?, limit))
    }
}

impl SubmissionSink for JsonlHistory {
    fn append(&self, dispatch: &Dispatch) -> Result<u64, SinkError> {
        Ok(self.record(dispatch, Utc::now())?.id)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    records: Vec<HistoryRecord>,
}

/// History kept for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryHistory {
    state: Mutex<MemoryState>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        dispatch: &Dispatch,
        timestamp: DateTime<Utc>,
    ) -> Result<HistoryRecord, HistoryError> {
        let mut state = lock(&self.state)?;
        state.next_id += 1;
        let record = HistoryRecord::new(state.next_id, dispatch, timestamp);
        state.records.push(record.clone());
        Ok(record)
    }
}

impl HistoryLog for MemoryHistory {
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let state = lock(&self.state)?;
        Ok(newest_first(state.records.clone(), limit))
    }
}

impl SubmissionSink for MemoryHistory {
    fn append(&self, dispatch: &Dispatch) -> Result<u64, SinkError> {
        Ok(self.record(dispatch, Utc::now())?.id)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// History backend selected by configuration.
pub enum HistoryStore {
    File(JsonlHistory),
    Memory(MemoryHistory),
}

impl HistoryStore {
    pub fn from_config(cfg: &HistoryConfig) -> Result<Self, HistoryError> {
        if !cfg.enabled {
            return Ok(HistoryStore::Memory(MemoryHistory::new()));
        }
        Ok(HistoryStore::File(JsonlHistory::open(&cfg.path())?))
    }

    /// Where records are persisted, if anywhere.
    pub fn location(&self) -> Option<&Path> {
        match self {
            HistoryStore::File(store) => Some(store.path()),
            HistoryStore::Memory(_) => None,
        }
    }
}

impl HistoryLog for HistoryStore {
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        match self {
            HistoryStore::File(store) => store.recent(limit),
            HistoryStore::Memory(store) => store.recent(limit),
        }
    }
}

impl SubmissionSink for HistoryStore {
    fn append(&self, dispatch: &Dispatch) -> Result<u64, SinkError> {
        match self {
            HistoryStore::File(store) => store.append(dispatch),
            HistoryStore::Memory(store) => store.append(dispatch),
        }
    }
}
