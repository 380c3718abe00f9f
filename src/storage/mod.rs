//! Storage layer for taskdeck data.
//!
//! The whole task collection lives in a single JSON file holding an array of
//! task records. Every read loads the full file and every write replaces it.
//!
//! ## Failure policy
//!
//! Callers treat "no tasks" and "unreadable file" the same way, so
//! [`JsonFileStore::load`] never fails: a missing, blank, or malformed file
//! yields an empty collection (malformed content is logged). A single entry
//! that does not fit the task shape is kept as raw JSON rather than failing
//! the whole file, so saving never drops records written by older clients.
//! Likewise
//! [`JsonFileStore::save`] logs and drops write errors. The fallible
//! `try_*` variants expose the underlying error.
//!
//! Writes go to a temporary sibling file that is renamed over the target, so
//! a crash mid-write leaves the previous contents intact.

use crate::Result;
use crate::models::StoredTask;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default file name for the task collection.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// Whole-file JSON store for the task collection.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the full collection, treating every failure as "no tasks".
    pub fn load(&self) -> Vec<StoredTask> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read task file");
                Vec::new()
            }
        }
    }

    /// Load the full collection.
    ///
    /// A missing file or one holding only whitespace is an empty collection.
    pub fn try_load(&self) -> Result<Vec<StoredTask>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<StoredTask> = serde_json::from_str(&content)?;
        let legacy = tasks
            .iter()
            .filter(|t| matches!(t, StoredTask::Legacy(_)))
            .count();
        if legacy > 0 {
            tracing::warn!(
                path = %self.path.display(),
                count = legacy,
                "task file holds entries that are not valid tasks; keeping them as-is"
            );
        }
        Ok(tasks)
    }

    /// Replace the file with `tasks`, logging and dropping any failure.
    pub fn save(&self, tasks: &[StoredTask]) {
        if let Err(e) = self.try_save(tasks) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to write task file");
        }
    }

    /// Replace the file with `tasks`.
    pub fn try_save(&self, tasks: &[StoredTask]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        tasks.serialize(&mut ser)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&buf)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved task file");
        Ok(())
    }
}
