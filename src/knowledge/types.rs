//! Core knowledge type definitions.
//!
//! Defines [`EntryType`] and [`EventType`] (the two closed enumerations),
//! [`Entry`] (a unit of knowledge with its [`Metadata`] and [`Permissions`]),
//! [`Event`] (an immutable activity record), and [`EventFilter`] (the
//! selection used by the monitor).

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::topic::TopicPattern;

/// Free-form event payload.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// The kinds of knowledge an entry can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Doc,
    /// A confirmed question/answer pair.
    Qa,
    Fact,
    Task,
    Link,
    Event,
}

impl EntryType {
    pub const ALL: [EntryType; 6] = [
        Self::Doc,
        Self::Qa,
        Self::Fact,
        Self::Task,
        Self::Link,
        Self::Event,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Qa => "qa",
            Self::Fact => "fact",
            Self::Task => "task",
            Self::Link => "link",
            Self::Event => "event",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown entry type: {s}"))
    }
}

/// Lifecycle events recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    EntryAdded,
    EntryUpdated,
    QuestionAsked,
    QuestionAnswered,
    QuestionUnanswered,
    QaConfirmed,
    AccessDenied,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        Self::EntryAdded,
        Self::EntryUpdated,
        Self::QuestionAsked,
        Self::QuestionAnswered,
        Self::QuestionUnanswered,
        Self::QaConfirmed,
        Self::AccessDenied,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntryAdded => "entry_added",
            Self::EntryUpdated => "entry_updated",
            Self::QuestionAsked => "question_asked",
            Self::QuestionAnswered => "question_answered",
            Self::QuestionUnanswered => "question_unanswered",
            Self::QaConfirmed => "qa_confirmed",
            Self::AccessDenied => "access_denied",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown event type: {s}"))
    }
}

/// Descriptive metadata attached to an entry at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Ordered tags; order is preserved through storage.
    pub tags: Vec<String>,
    /// Set once at insertion, never changed.
    pub created_at: DateTime<Utc>,
    /// Actor that created the entry.
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

/// Read/write allow-lists. An empty set means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub read: BTreeSet<String>,
    pub write: BTreeSet<String>,
}

impl Permissions {
    /// Open for everyone, the default for ingested entries.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn can_read(&self, actor: &str) -> bool {
        self.read.is_empty() || self.read.contains(actor)
    }
}

/// A persisted unit of knowledge, matching the `entries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// UUID v7, assigned at creation.
    pub id: String,
    /// Hierarchical path such as `/team/onboarding`.
    pub topic: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub content: String,
    pub metadata: Metadata,
    pub permissions: Permissions,
    /// Starts at 1. Entries are append-only, so it never moves.
    pub version: u32,
}

/// An immutable record of something that happened, matching the `events` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub topic: String,
    /// Advisory back-reference to an entry; not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Event {
    /// Build a fresh event stamped with a new id and the current time.
    pub fn new(
        event_type: EventType,
        actor: &str,
        topic: &str,
        entry_id: Option<&str>,
        payload: Option<Payload>,
    ) -> Self {
        Self {
            id: new_id(),
            event_type,
            timestamp: now(),
            actor: actor.to_string(),
            topic: topic.to_string(),
            entry_id: entry_id.map(str::to_string),
            payload,
        }
    }
}

/// Selection applied by [`crate::store::Store::get_events`].
///
/// Every field is optional; an empty `types` list selects all types.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub topic: Option<TopicPattern>,
    pub types: Vec<EventType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub actor: Option<String>,
}

impl EventFilter {
    /// `from` rounded up and `to` truncated to the stored precision, so a
    /// sub-microsecond bound selects the same events on every backend.
    pub fn time_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.from.map(ceil_micros), self.to.map(|to| to.trunc_subsecs(6)))
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref pattern) = self.topic {
            if !pattern.matches(&event.topic) {
                return false;
            }
        }
        if !self.types.is_empty() && !self.types.contains(&event.event_type) {
            return false;
        }
        let timestamp = event.timestamp.trunc_subsecs(6);
        let (from, to) = self.time_bounds();
        if from.is_some_and(|from| timestamp < from) {
            return false;
        }
        if to.is_some_and(|to| timestamp > to) {
            return false;
        }
        if let Some(ref actor) = self.actor {
            if &event.actor != actor {
                return false;
            }
        }
        true
    }
}

/// Generate a time-sortable identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Current time at the precision the stores persist (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn ceil_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    let floor = ts.trunc_subsecs(6);
    if floor == ts {
        ts
    } else {
        floor + chrono::Duration::microseconds(1)
    }
}

/// Fixed-width RFC 3339 form, so lexical order equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Turn a `json!({...})` literal into a payload map. Non-objects yield `None`.
pub fn payload(value: serde_json::Value) -> Option<Payload> {
    match value {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    }
}
