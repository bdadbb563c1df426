//! Schedule record definitions.
//!
//! Defines the [`ScheduleRecord`] type, the [`Repeat`] and
//! [`ReminderChannel`] enums, and the tagged [`ChannelConfig`] carried by
//! records that deliver reminders through an external webhook.

use crate::error::{AgendaError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for a schedule record.
///
/// Assigned at creation time and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(Uuid);

impl ScheduleId {
    /// Generate a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Recurrence tag.
///
/// Stored on the record but never expanded into occurrences: the scanner
/// only ever looks at the literal `start_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// One-off schedule.
    #[default]
    None,
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
}

/// Reminder delivery channel tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    /// In-process notice channel (the only channel this crate delivers to).
    Local,
    /// DingTalk group robot webhook.
    #[serde(rename = "dingtalk")]
    DingTalk,
    /// WeCom group robot webhook.
    #[serde(rename = "wecom")]
    WeCom,
    /// Feishu custom bot webhook.
    Feishu,
}

impl std::fmt::Display for ReminderChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::DingTalk => "dingtalk",
            Self::WeCom => "wecom",
            Self::Feishu => "feishu",
        };
        f.write_str(name)
    }
}

/// Per-channel delivery configuration.
///
/// Each variant carries only the fields its channel needs and is validated
/// at construction via [`ChannelConfig::webhook`]. This crate stores the
/// configuration but performs no outbound delivery; dispatch belongs to an
/// external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelConfig {
    /// DingTalk robot webhook endpoint.
    #[serde(rename = "dingtalk")]
    DingTalk {
        /// Webhook URL, http or https.
        url: String,
    },
    /// WeCom robot webhook endpoint.
    #[serde(rename = "wecom")]
    WeCom {
        /// Webhook URL, http or https.
        url: String,
    },
    /// Feishu bot webhook endpoint.
    Feishu {
        /// Webhook URL, http or https.
        url: String,
    },
}

impl ChannelConfig {
    /// Build a validated webhook configuration for an external channel.
    ///
    /// # Errors
    ///
    /// Returns an error for [`ReminderChannel::Local`] (it carries no
    /// configuration), for unparseable URLs, and for schemes other than
    /// http/https.
    pub fn webhook(channel: ReminderChannel, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let parsed = url::Url::parse(&url)
            .map_err(|e| AgendaError::ChannelConfig(format!("invalid webhook URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AgendaError::ChannelConfig(format!(
                "webhook URL must be http(s), got scheme '{}'",
                parsed.scheme()
            )));
        }

        match channel {
            ReminderChannel::Local => Err(AgendaError::ChannelConfig(
                "local channel takes no webhook configuration".to_owned(),
            )),
            ReminderChannel::DingTalk => Ok(Self::DingTalk { url }),
            ReminderChannel::WeCom => Ok(Self::WeCom { url }),
            ReminderChannel::Feishu => Ok(Self::Feishu { url }),
        }
    }

    /// The channel this configuration belongs to.
    #[must_use]
    pub fn channel(&self) -> ReminderChannel {
        match self {
            Self::DingTalk { .. } => ReminderChannel::DingTalk,
            Self::WeCom { .. } => ReminderChannel::WeCom,
            Self::Feishu { .. } => ReminderChannel::Feishu,
        }
    }

    /// The configured webhook URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::DingTalk { url } | Self::WeCom { url } | Self::Feishu { url } => url,
        }
    }
}

/// A single schedule entry.
///
/// `start_time` and `end_time` are both absolute; nothing enforces that
/// start precedes end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    /// Unique record id.
    pub id: ScheduleId,
    /// Display title.
    pub title: String,
    /// Absolute start timestamp.
    pub start_time: DateTime<Utc>,
    /// Absolute end timestamp.
    pub end_time: DateTime<Utc>,
    /// Optional location text.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional description text.
    #[serde(default)]
    pub description: Option<String>,
    /// Recurrence tag, stored but not expanded.
    #[serde(default)]
    pub repeat: Repeat,
    /// Reminder lead time in minutes. 0 means "no reminder".
    #[serde(default)]
    pub reminder_lead_minutes: u32,
    /// Delivery channel tags for the reminder.
    #[serde(default)]
    pub reminder_channels: Vec<ReminderChannel>,
    /// Per-channel webhook configuration for external channels.
    #[serde(default)]
    pub channel_configs: Vec<ChannelConfig>,
    /// Whether the schedule is shared with other users.
    #[serde(default)]
    pub shared: bool,
    /// User ids this schedule is shared with. Stored, uninterpreted.
    #[serde(default)]
    pub shared_with: Option<Vec<String>>,
}

impl ScheduleRecord {
    /// The instant the reminder should fire, or `None` when the record has
    /// no reminder (`reminder_lead_minutes == 0`).
    #[must_use]
    pub fn reminder_at(&self) -> Option<DateTime<Utc>> {
        if self.reminder_lead_minutes == 0 {
            return None;
        }
        Some(self.start_time - Duration::minutes(i64::from(self.reminder_lead_minutes)))
    }
}

/// Fields for creating a schedule record. The store assigns the id and
/// applies channel defaults.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    /// Display title.
    pub title: String,
    /// Absolute start timestamp.
    pub start_time: DateTime<Utc>,
    /// Absolute end timestamp.
    pub end_time: DateTime<Utc>,
    /// Optional location text.
    pub location: Option<String>,
    /// Optional description text.
    pub description: Option<String>,
    /// Recurrence tag.
    pub repeat: Repeat,
    /// Reminder lead time in minutes.
    pub reminder_lead_minutes: u32,
    /// Delivery channels. Empty means "use the default" (local only).
    pub reminder_channels: Vec<ReminderChannel>,
    /// Per-channel webhook configuration.
    pub channel_configs: Vec<ChannelConfig>,
    /// Whether the schedule is shared with other users.
    pub shared: bool,
    /// User ids this schedule is shared with.
    pub shared_with: Option<Vec<String>>,
}

impl NewSchedule {
    /// Minimal creation fields; everything else defaults.
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
            location: None,
            description: None,
            repeat: Repeat::None,
            reminder_lead_minutes: 0,
            reminder_channels: Vec::new(),
            channel_configs: Vec::new(),
            shared: false,
            shared_with: None,
        }
    }
}

/// Partial update for a schedule record.
///
/// `None` leaves the field untouched. Clearable optional fields use a
/// nested `Option`: `Some(None)` clears, `Some(Some(v))` replaces.
#[derive(Debug, Clone, Default)]
pub struct SchedulePatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement start timestamp.
    pub start_time: Option<DateTime<Utc>>,
    /// Replacement end timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Replacement (or cleared) location.
    pub location: Option<Option<String>>,
    /// Replacement (or cleared) description.
    pub description: Option<Option<String>>,
    /// Replacement recurrence tag.
    pub repeat: Option<Repeat>,
    /// Replacement reminder lead time.
    pub reminder_lead_minutes: Option<u32>,
    /// Replacement channel list.
    pub reminder_channels: Option<Vec<ReminderChannel>>,
    /// Replacement channel configuration list.
    pub channel_configs: Option<Vec<ChannelConfig>>,
    /// Replacement shared flag.
    pub shared: Option<bool>,
    /// Replacement (or cleared) shared-with list.
    pub shared_with: Option<Option<Vec<String>>>,
}

impl SchedulePatch {
    /// Apply the supplied fields to `record`, leaving the rest untouched.
    /// The id is never patched.
    pub fn apply(self, record: &mut ScheduleRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(start_time) = self.start_time {
            record.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            record.end_time = end_time;
        }
        if let Some(location) = self.location {
            record.location = location;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(repeat) = self.repeat {
            record.repeat = repeat;
        }
        if let Some(lead) = self.reminder_lead_minutes {
            record.reminder_lead_minutes = lead;
        }
        if let Some(channels) = self.reminder_channels {
            record.reminder_channels = channels;
        }
        if let Some(configs) = self.channel_configs {
            record.channel_configs = configs;
        }
        if let Some(shared) = self.shared {
            record.shared = shared;
        }
        if let Some(shared_with) = self.shared_with {
            record.shared_with = shared_with;
        }
    }
}
