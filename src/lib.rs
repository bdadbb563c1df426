//! Agenda: schedule store with a fixed-interval reminder scanner.
//!
//! The crate has two moving parts wired together by a composition root:
//! - **Schedule store**: an ordered collection of schedule records held in
//!   memory and mirrored to a JSON snapshot file after every mutation.
//! - **Reminder scanner**: a periodic loop that compares the wall clock
//!   against each record's reminder threshold and emits at most one notice
//!   per record per process lifetime over an in-process channel.
//!
//! Persistence failures never crash anything: a bad snapshot loads as an
//! empty collection and a failed write leaves the in-memory state
//! authoritative, both reported to the notice channel.

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod notice;
pub mod schedule;

pub use config::AgendaConfig;
pub use error::{AgendaError, Result};
pub use notice::{Notice, NoticeKind, NoticeReceiver, NoticeSender};
pub use schedule::{
    NewSchedule, ReminderScanner, ScheduleId, SchedulePatch, ScheduleRecord, ScheduleStore,
    SharedScheduleStore,
};
