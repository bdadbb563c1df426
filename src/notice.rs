//! User-facing notices.
//!
//! The store and scanner never render anything themselves; they emit
//! [`Notice`] values on an unbounded channel and the composition root
//! decides how to surface them (toast, log line, desktop notification).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// Suggested display duration when the config does not override it.
pub const DEFAULT_NOTICE_DURATION_MS: u32 = 5_000;

/// Why a notice was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A schedule reminder crossed its threshold.
    Reminder,
    /// A recoverable storage failure (load or save).
    Warning,
}

/// A single user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Short title.
    pub title: String,
    /// Longer descriptive message.
    pub body: String,
    /// Suggested display duration in milliseconds.
    pub duration_ms: u32,
    /// Notice category.
    pub kind: NoticeKind,
}

impl Notice {
    /// Build a reminder notice with the default display duration.
    pub fn reminder(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
            kind: NoticeKind::Reminder,
        }
    }

    /// Build a warning notice with the default display duration.
    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
            kind: NoticeKind::Warning,
        }
    }
}

/// Sending half of the notice channel.
pub type NoticeSender = mpsc::UnboundedSender<Notice>;

/// Receiving half of the notice channel.
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Create a fresh notice channel.
#[must_use]
pub fn channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Send a notice, tolerating a closed receiver.
///
/// Delivery is fire-and-forget: once the consumer is gone there is nothing
/// useful to do with a notice, so send failures are logged at debug level
/// and dropped.
pub fn send(tx: &NoticeSender, notice: Notice) {
    if tx.send(notice).is_err() {
        debug!("notice channel closed, dropping notice");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_constructor_sets_kind_and_duration() {
        let notice = Notice::reminder("Standup", "starts at 09:30");
        assert_eq!(notice.kind, NoticeKind::Reminder);
        assert_eq!(notice.duration_ms, DEFAULT_NOTICE_DURATION_MS);
        assert_eq!(notice.title, "Standup");
        assert_eq!(notice.body, "starts at 09:30");
    }

    #[test]
    fn warning_constructor_sets_kind() {
        let notice = Notice::warning("Save failed", "disk full");
        assert_eq!(notice.kind, NoticeKind::Warning);
    }

    #[test]
    fn send_delivers_over_channel() {
        let (tx, mut rx) = channel();
        send(&tx, Notice::reminder("a", "b"));
        let got = rx.try_recv().expect("notice available");
        assert_eq!(got.title, "a");
    }

    #[test]
    fn send_tolerates_closed_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        // Must not panic.
        send(&tx, Notice::warning("x", "y"));
    }

    #[test]
    fn notice_serde_round_trip() {
        let notice = Notice::reminder("Review", "starts at 14:00");
        let json = serde_json::to_string(&notice).expect("serialize");
        let restored: Notice = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, notice);
    }
}
