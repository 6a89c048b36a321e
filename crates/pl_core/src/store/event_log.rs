use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::MatchEvent;

/// File name of the persisted draft log. Deliberately distinct from the
/// match-configuration key.
pub const EVENT_LOG_FILE: &str = "match_events_draft_passing.json";

/// Ordered, append-only log of finished events for the current session.
///
/// Insertion order is capture order, not video-time order. Every mutation is
/// flushed to disk before it reports success; on a failed flush the
/// in-memory list keeps the mutation so nothing the operator logged is lost.
#[derive(Debug)]
pub struct DraftEventStore {
    path: PathBuf,
    events: Vec<MatchEvent>,
}

impl DraftEventStore {
    /// Loads the persisted log, treating a missing or unreadable file as an
    /// empty log. Corruption is logged, never propagated.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let events = match Self::load_from_path(&path) {
            Ok(events) => events,
            Err(err) => {
                log::warn!(
                    "failed to recover draft events from {:?}: {}; starting with an empty log",
                    path,
                    err
                );
                Vec::new()
            }
        };
        log::info!("draft event store opened with {} event(s)", events.len());
        Self { path, events }
    }

    /// Appends to the end and flushes. No deduplication, no reordering.
    pub fn append(&mut self, event: MatchEvent) -> Result<()> {
        self.events.push(event);
        self.flush()
    }

    /// Read-only view of the log, most-recent-last.
    pub fn list(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Irreversibly empties the log and its persisted backing. Callers must
    /// obtain operator confirmation before invoking this.
    pub fn clear(&mut self) -> Result<()> {
        self.events.clear();
        self.flush()?;
        log::info!("draft event log cleared");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_path(path: &Path) -> Result<Vec<MatchEvent>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut file = File::open(path)?;
        let mut data = String::new();
        file.read_to_string(&mut data)?;

        let events = serde_json::from_str(&data)?;
        Ok(events)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec(&self.events)?;

        // Atomic save: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }

        rename(&temp_path, &self.path)?;

        log::debug!("flushed {} event(s) to {:?}", self.events.len(), self.path);
        Ok(())
    }
}
