//! Reminder scanner background loop.
//!
//! Ticks on a fixed wall-clock interval, compares the current time against
//! each record's reminder threshold, and emits at most one notice per
//! record per process lifetime. The fired-marker set lives inside the
//! scanner, so a restart (a new "session") starts fresh; that reset is a
//! documented property of the design, not a bug.

use crate::notice::{self, Notice, NoticeSender};
use crate::schedule::record::{ScheduleId, ScheduleRecord};
use crate::schedule::store::SharedScheduleStore;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

/// Interval between scanner ticks (seconds).
pub const SCAN_INTERVAL_SECS: u64 = 60;

/// Symmetric tolerance band around the reminder threshold (seconds).
///
/// A reminder fires while `|now - reminder_at|` is within this band,
/// compensating for the scanner's own polling granularity.
pub const TOLERANCE_SECS: i64 = 60;

/// Periodic reminder scanner.
pub struct ReminderScanner {
    /// Ids that already fired this session.
    fired: HashSet<ScheduleId>,
    /// Channel for reminder notices.
    notice_tx: NoticeSender,
    /// Time between ticks.
    scan_interval: std::time::Duration,
    /// Tolerance band around the reminder threshold.
    tolerance: Duration,
    /// Display duration for emitted reminder notices.
    notice_duration_ms: u32,
}

impl ReminderScanner {
    /// Create a scanner with the default cadence and tolerance.
    #[must_use]
    pub fn new(notice_tx: NoticeSender) -> Self {
        Self {
            fired: HashSet::new(),
            notice_tx,
            scan_interval: std::time::Duration::from_secs(SCAN_INTERVAL_SECS),
            tolerance: Duration::seconds(TOLERANCE_SECS),
            notice_duration_ms: crate::notice::DEFAULT_NOTICE_DURATION_MS,
        }
    }

    /// Override the tick interval.
    #[must_use]
    pub fn with_scan_interval(mut self, interval: std::time::Duration) -> Self {
        self.scan_interval = interval;
        self
    }

    /// Override the tolerance band.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the display duration of emitted notices.
    #[must_use]
    pub fn with_notice_duration_ms(mut self, duration_ms: u32) -> Self {
        self.notice_duration_ms = duration_ms;
        self
    }

    /// Ids that already fired this session.
    #[must_use]
    pub fn fired(&self) -> &HashSet<ScheduleId> {
        &self.fired
    }

    /// Scan `records` as of `now`. Returns the number of notices emitted.
    ///
    /// A record fires when all of:
    /// - `reminder_lead_minutes > 0`,
    /// - `|now - (start_time - lead)|` is within the tolerance band,
    /// - it has not fired before in this session.
    ///
    /// Crossings that were already outside the band before the first scan
    /// never fire: there is no catch-up. External webhook channels on the
    /// record are configuration only; the notice goes to the local channel.
    pub fn scan_at(&mut self, records: &[ScheduleRecord], now: DateTime<Utc>) -> usize {
        let mut emitted = 0;
        for record in records {
            let Some(reminder_at) = record.reminder_at() else {
                continue;
            };
            if self.fired.contains(&record.id) {
                continue;
            }
            if (now - reminder_at).abs() > self.tolerance {
                continue;
            }

            debug!("reminder fired for schedule {}", record.id);
            let mut n = Notice::reminder(
                record.title.clone(),
                format!("starts at {}", record.start_time.format("%Y-%m-%d %H:%M UTC")),
            );
            n.duration_ms = self.notice_duration_ms;
            notice::send(&self.notice_tx, n);

            self.fired.insert(record.id);
            emitted += 1;
        }
        emitted
    }

    /// Start the scanner background loop over a shared store.
    ///
    /// Each tick locks the store, scans synchronously, and releases the
    /// lock before sleeping again. Aborting the returned handle stops the
    /// loop; no timer outlives it.
    pub fn run(mut self, store: SharedScheduleStore) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "reminder scanner started (every {}s, tolerance {}s)",
                self.scan_interval.as_secs(),
                self.tolerance.num_seconds()
            );
            let mut interval = tokio::time::interval(self.scan_interval);

            loop {
                interval.tick().await;
                let guard = store.lock().await;
                let emitted = self.scan_at(guard.records(), Utc::now());
                drop(guard);
                if emitted > 0 {
                    debug!("scanner tick emitted {emitted} reminder(s)");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::notice::{self as notice_mod, NoticeKind, NoticeReceiver};
    use crate::schedule::record::{NewSchedule, Repeat, ReminderChannel};
    use crate::schedule::store::ScheduleStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn make_scanner() -> (ReminderScanner, NoticeReceiver) {
        let (tx, rx) = notice_mod::channel();
        (ReminderScanner::new(tx), rx)
    }

    fn record_with_lead(title: &str, start: DateTime<Utc>, lead: u32) -> ScheduleRecord {
        ScheduleRecord {
            id: ScheduleId::new(),
            title: title.to_owned(),
            start_time: start,
            end_time: start + Duration::hours(1),
            location: None,
            description: None,
            repeat: Repeat::None,
            reminder_lead_minutes: lead,
            reminder_channels: vec![ReminderChannel::Local],
            channel_configs: Vec::new(),
            shared: false,
            shared_with: None,
        }
    }

    #[test]
    fn fires_exactly_once_inside_window() {
        let (mut scanner, mut rx) = make_scanner();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let records = vec![record_with_lead("Standup", start, 10)];

        let now = start - Duration::minutes(10);
        assert_eq!(scanner.scan_at(&records, now), 1);

        let notice = rx.try_recv().expect("reminder notice");
        assert_eq!(notice.kind, NoticeKind::Reminder);
        assert_eq!(notice.title, "Standup");
        assert!(notice.body.contains("2026-05-01 10:00"), "body: {}", notice.body);

        // One second later, still inside the window: idempotent.
        assert_eq!(scanner.scan_at(&records, now + Duration::seconds(1)), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn zero_lead_never_fires() {
        let (mut scanner, mut rx) = make_scanner();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let records = vec![record_with_lead("No reminder", start, 0)];

        // Even exactly at the start time, nothing fires.
        assert_eq!(scanner.scan_at(&records, start), 0);
        assert_eq!(scanner.scan_at(&records, start - Duration::minutes(1)), 0);
        assert!(rx.try_recv().is_err());
        assert!(scanner.fired().is_empty());
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let (mut scanner, _rx) = make_scanner();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let reminder_at = start - Duration::minutes(10);

        let early = vec![record_with_lead("early edge", start, 10)];
        assert_eq!(scanner.scan_at(&early, reminder_at - Duration::seconds(60)), 1);

        let late = vec![record_with_lead("late edge", start, 10)];
        assert_eq!(scanner.scan_at(&late, reminder_at + Duration::seconds(60)), 1);
    }

    #[test]
    fn outside_window_never_fires() {
        let (mut scanner, mut rx) = make_scanner();
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let records = vec![record_with_lead("Missed", start, 10)];
        let reminder_at = start - Duration::minutes(10);

        // Threshold crossed long before the scanner started: no catch-up.
        assert_eq!(scanner.scan_at(&records, reminder_at + Duration::seconds(61)), 0);
        assert_eq!(scanner.scan_at(&records, reminder_at + Duration::hours(2)), 0);
        assert_eq!(scanner.scan_at(&records, reminder_at - Duration::seconds(61)), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn independent_records_each_fire_once() {
        let (mut scanner, mut rx) = make_scanner();
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 50, 0).unwrap();
        let records = vec![
            record_with_lead("a", now + Duration::minutes(10), 10),
            record_with_lead("b", now + Duration::minutes(5), 5),
            record_with_lead("far", now + Duration::hours(3), 10),
        ];

        assert_eq!(scanner.scan_at(&records, now), 2);
        assert_eq!(scanner.scan_at(&records, now + Duration::seconds(30)), 0);

        let titles: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn custom_notice_duration_is_applied() {
        let (tx, mut rx) = notice_mod::channel();
        let mut scanner = ReminderScanner::new(tx).with_notice_duration_ms(1_500);
        let start = Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap();
        let records = vec![record_with_lead("short toast", start, 10)];

        scanner.scan_at(&records, start - Duration::minutes(10));
        let notice = rx.try_recv().expect("notice");
        assert_eq!(notice.duration_ms, 1_500);
    }

    #[tokio::test]
    async fn run_ticks_over_shared_store() {
        let (tx, mut rx) = notice_mod::channel();
        let mut store = ScheduleStore::in_memory(tx.clone());

        let start = Utc::now() + Duration::minutes(10);
        let mut fields = NewSchedule::new("Loop", start, start + Duration::hours(1));
        fields.reminder_lead_minutes = 10;
        store.add(fields);

        let shared: SharedScheduleStore = Arc::new(tokio::sync::Mutex::new(store));
        let scanner = ReminderScanner::new(tx)
            .with_scan_interval(std::time::Duration::from_millis(10));
        let handle = scanner.run(Arc::clone(&shared));

        let notice = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("scanner ticked in time")
            .expect("channel open");
        assert_eq!(notice.kind, NoticeKind::Reminder);
        assert_eq!(notice.title, "Loop");

        handle.abort();
    }

    #[tokio::test]
    async fn aborting_the_handle_stops_the_loop() {
        let (tx, _rx) = notice_mod::channel();
        let store = ScheduleStore::in_memory(tx.clone());
        let shared: SharedScheduleStore = Arc::new(tokio::sync::Mutex::new(store));

        let scanner = ReminderScanner::new(tx)
            .with_scan_interval(std::time::Duration::from_millis(5));
        let handle = scanner.run(shared);
        handle.abort();

        let joined = handle.await;
        assert!(joined.unwrap_err().is_cancelled());
    }
}
