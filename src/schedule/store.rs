//! Schedule store.
//!
//! Holds the ordered schedule collection in memory and mirrors it to a
//! single JSON snapshot file after every mutation. The in-memory collection
//! is the source of truth: persistence failures are surfaced as notices and
//! never roll state back.

use crate::error::{AgendaError, Result};
use crate::notice::{self, Notice, NoticeSender};
use crate::schedule::record::{
    NewSchedule, ReminderChannel, ScheduleId, SchedulePatch, ScheduleRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// Persisted snapshot wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    /// Schema version.
    #[serde(default = "default_state_version")]
    version: u8,
    /// Persisted schedule records, in insertion order.
    #[serde(default)]
    schedules: Vec<ScheduleRecord>,
}

fn default_state_version() -> u8 {
    1
}

/// Store handle shared between the composition root and the scanner loop.
pub type SharedScheduleStore = std::sync::Arc<tokio::sync::Mutex<ScheduleStore>>;

/// In-memory schedule collection mirrored to a JSON snapshot.
///
/// Owned by the composition root and injected into consumers; the scanner
/// borrows it through a shared lock. Insertion order is the collection
/// order, and every mutation rewrites the whole snapshot (last full
/// snapshot wins).
pub struct ScheduleStore {
    /// Records in insertion order.
    records: Vec<ScheduleRecord>,
    /// Snapshot path. `None` disables persistence (tests).
    snapshot_path: Option<PathBuf>,
    /// Channel for user-facing storage warnings.
    notice_tx: NoticeSender,
}

impl ScheduleStore {
    /// Load the store from `path`.
    ///
    /// A missing snapshot yields an empty store. A malformed or unreadable
    /// snapshot also yields an empty store, with the failure reported as a
    /// warning notice rather than an error: the caller keeps a usable
    /// (memory-only until the next successful save) store either way.
    pub fn load(path: Option<PathBuf>, notice_tx: NoticeSender) -> Self {
        let records = match read_snapshot(path.as_deref()) {
            Ok(records) => {
                if let Some(p) = &path {
                    debug!("loaded {} schedules from {}", records.len(), p.display());
                }
                records
            }
            Err(e) => {
                warn!("cannot load schedule snapshot, starting empty: {e}");
                notice::send(
                    &notice_tx,
                    Notice::warning("Schedules could not be loaded", e.to_string()),
                );
                Vec::new()
            }
        };

        Self {
            records,
            snapshot_path: path,
            notice_tx,
        }
    }

    /// Create an empty, non-persisting store. Used by tests and by callers
    /// that manage persistence elsewhere.
    #[must_use]
    pub fn in_memory(notice_tx: NoticeSender) -> Self {
        Self {
            records: Vec::new(),
            snapshot_path: None,
            notice_tx,
        }
    }

    /// All records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ScheduleRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: ScheduleId) -> Option<&ScheduleRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Create a record from `fields`, assign it a fresh id, apply channel
    /// defaults, append it, and persist. Returns the created record.
    ///
    /// An empty channel list defaults to `[Local]`; the channel
    /// configuration list defaults to empty.
    pub fn add(&mut self, fields: NewSchedule) -> ScheduleRecord {
        let reminder_channels = if fields.reminder_channels.is_empty() {
            vec![ReminderChannel::Local]
        } else {
            fields.reminder_channels
        };

        let record = ScheduleRecord {
            id: ScheduleId::new(),
            title: fields.title,
            start_time: fields.start_time,
            end_time: fields.end_time,
            location: fields.location,
            description: fields.description,
            repeat: fields.repeat,
            reminder_lead_minutes: fields.reminder_lead_minutes,
            reminder_channels,
            channel_configs: fields.channel_configs,
            shared: fields.shared,
            shared_with: fields.shared_with,
        };

        self.records.push(record.clone());
        self.persist();
        record
    }

    /// Apply a partial update to the record matching `id` and persist.
    /// Returns `false` (and does nothing) when no record matches.
    pub fn update(&mut self, id: ScheduleId, patch: SchedulePatch) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        patch.apply(record);
        self.persist();
        true
    }

    /// Remove the record matching `id` and persist. Returns `false` (and
    /// does nothing) when no record matches.
    pub fn remove(&mut self, id: ScheduleId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Records whose `start_time` falls on the calendar day `date` (UTC),
    /// in insertion order. Calendar-day equality, not a range query.
    #[must_use]
    pub fn on_date(&self, date: NaiveDate) -> Vec<&ScheduleRecord> {
        self.records
            .iter()
            .filter(|r| r.start_time.date_naive() == date)
            .collect()
    }

    /// Write the full snapshot. Failures leave the in-memory state
    /// authoritative: the error is logged once and reported as a warning
    /// notice, with no retry and no rollback.
    fn persist(&self) {
        if let Err(e) = write_snapshot(self.snapshot_path.as_deref(), &self.records) {
            error!("cannot persist schedule snapshot: {e}");
            notice::send(
                &self.notice_tx,
                Notice::warning("Schedules could not be saved", e.to_string()),
            );
        }
    }
}

fn read_snapshot(path: Option<&std::path::Path>) -> Result<Vec<ScheduleRecord>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };

    let bytes = match std::fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(AgendaError::Storage(format!("cannot read snapshot: {e}")));
        }
    };

    let state: StoreState = serde_json::from_slice(&bytes)
        .map_err(|e| AgendaError::Storage(format!("cannot parse snapshot: {e}")))?;

    Ok(state.schedules)
}

fn write_snapshot(path: Option<&std::path::Path>, records: &[ScheduleRecord]) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| AgendaError::Storage(format!("cannot create snapshot dir: {e}")))?;
    }

    let state = StoreState {
        version: default_state_version(),
        schedules: records.to_vec(),
    };

    let json = serde_json::to_string_pretty(&state)
        .map_err(|e| AgendaError::Storage(format!("cannot serialize snapshot: {e}")))?;

    std::fs::write(path, json)
        .map_err(|e| AgendaError::Storage(format!("cannot write snapshot: {e}")))?;

    Ok(())
}
