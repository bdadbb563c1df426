//! Schedule store and reminder scanner.
//!
//! The store owns the ordered record collection and its JSON snapshot; the
//! scanner polls the store on a fixed cadence and emits one-shot reminder
//! notices. Store underlies scanner; nothing else couples them beyond the
//! shared lock.

pub mod record;
pub mod scanner;
pub mod store;

pub use record::{
    ChannelConfig, NewSchedule, ReminderChannel, Repeat, ScheduleId, SchedulePatch,
    ScheduleRecord,
};
pub use scanner::ReminderScanner;
pub use store::{ScheduleStore, SharedScheduleStore};
