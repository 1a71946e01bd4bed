//! Boundary request and response shapes for the four operations.
//!
//! Requests arrive loosely typed (strings for enumerations and timestamps) and
//! are checked here before any flow runs, so a rejected request never leaves
//! an event behind.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::topic::TopicPattern;
use super::truncate_chars;
use super::types::{parse_timestamp, Entry, EntryType, Event, EventFilter, EventType};
use crate::error::{KnowledgeError, Result};

/// Characters of content shown in a source excerpt.
pub const EXCERPT_CHARS: usize = 150;

/// Input for ingesting a knowledge item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    pub topic: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub context: Option<BTreeMap<String, String>>,
    pub actor: String,
}

impl PutRequest {
    /// Check required fields and resolve the entry type.
    pub fn validate(&self) -> Result<EntryType> {
        require("topic", &self.topic)?;
        require("type", &self.entry_type)?;
        require("content", &self.content)?;
        require("actor", &self.actor)?;
        self.entry_type
            .trim()
            .parse::<EntryType>()
            .map_err(KnowledgeError::Validation)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub topic: String,
    pub actor: String,
}

impl AskRequest {
    pub fn validate(&self) -> Result<()> {
        require("question", &self.question)?;
        require("topic", &self.topic)?;
        require("actor", &self.actor)
    }
}

/// Input for promoting a question/answer pair to a `qa` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub question: String,
    pub answer: String,
    pub topic: String,
    pub actor: String,
}

impl ConfirmRequest {
    pub fn validate(&self) -> Result<()> {
        require("question", &self.question)?;
        require("answer", &self.answer)?;
        require("topic", &self.topic)?;
        require("actor", &self.actor)
    }

    /// Content of the resulting `qa` entry.
    pub fn qa_content(&self) -> String {
        format!("Q: {}\n\nA: {}", self.question, self.answer)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub event_types: Option<Vec<String>>,
    /// RFC 3339, inclusive.
    #[serde(default)]
    pub from: Option<String>,
    /// RFC 3339, inclusive.
    #[serde(default)]
    pub to: Option<String>,
    pub actor: String,
}

impl MonitorRequest {
    /// Validate and convert into a store filter scoped to the requesting actor.
    pub fn to_filter(&self) -> Result<EventFilter> {
        require("actor", &self.actor)?;

        let topic = self
            .topic
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(TopicPattern::parse);

        let mut types = Vec::new();
        let mut seen = HashSet::new();
        for raw in self.event_types.iter().flatten() {
            let t = raw
                .trim()
                .parse::<EventType>()
                .map_err(KnowledgeError::Validation)?;
            if seen.insert(t) {
                types.push(t);
            }
        }

        let from = parse_bound("from", self.from.as_deref())?;
        let to = parse_bound("to", self.to.as_deref())?;

        Ok(EventFilter {
            topic,
            types,
            from,
            to,
            actor: Some(self.actor.clone()),
        })
    }
}

/// One cited entry in an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub entry_id: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub excerpt: String,
}

impl Source {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            entry_id: entry.id.clone(),
            topic: entry.topic.clone(),
            entry_type: entry.entry_type,
            excerpt: truncate_chars(&entry.content, EXCERPT_CHARS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followups: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorSummary {
    pub total: u64,
    /// Every event type is present, zero when nothing matched.
    pub by_type: BTreeMap<EventType, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorResponse {
    pub events: Vec<Event>,
    pub summary: MonitorSummary,
}

/// Distinct topics and entry types currently stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub topics: Vec<String>,
    pub types: Vec<EntryType>,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KnowledgeError::validation(format!(
            "missing required field: {field}"
        )));
    }
    Ok(())
}

fn parse_bound(field: &str, value: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_timestamp(v).map(Some).map_err(|e| {
            KnowledgeError::validation(format!("{field} is not an RFC 3339 timestamp: {e}"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(entry_type: &str) -> PutRequest {
        PutRequest {
            topic: "/team".into(),
            entry_type: entry_type.into(),
            content: "Standup is at 9:30".into(),
            tags: vec![],
            context: None,
            actor: "alice".into(),
        }
    }

    #[test]
    fn put_rejects_unknown_type() {
        let err = put("memo").validate().unwrap_err();
        assert!(matches!(err, KnowledgeError::Validation(_)));
        assert!(err.to_string().contains("unknown entry type"));
        assert_eq!(put("fact").validate().unwrap(), EntryType::Fact);
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let mut req = put("doc");
        req.content = "   ".into();
        let err = req.validate().unwrap_err();
        assert_eq!(err.public_message(), "missing required field: content");

        let ask = AskRequest {
            question: "What time is standup?".into(),
            topic: "/team".into(),
            actor: String::new(),
        };
        assert!(ask.validate().is_err());
    }

    #[test]
    fn put_request_deserializes_without_optionals() {
        let req: PutRequest = serde_json::from_str(
            r#"{"topic":"/t","type":"doc","content":"c","actor":"a"}"#,
        )
        .unwrap();
        assert!(req.tags.is_empty());
        assert!(req.context.is_none());
    }

    #[test]
    fn confirm_builds_qa_content() {
        let req = ConfirmRequest {
            question: "Where is the wiki?".into(),
            answer: "At /wiki".into(),
            topic: "/team".into(),
            actor: "alice".into(),
        };
        assert_eq!(req.qa_content(), "Q: Where is the wiki?\n\nA: At /wiki");
    }

    #[test]
    fn monitor_filter_is_scoped_to_actor() {
        let req = MonitorRequest {
            topic: Some("/team".into()),
            event_types: Some(vec!["question_asked".into(), "question_asked".into()]),
            from: Some("2024-01-01T00:00:00Z".into()),
            to: None,
            actor: "alice".into(),
        };
        let filter = req.to_filter().unwrap();
        assert_eq!(filter.actor.as_deref(), Some("alice"));
        assert_eq!(filter.types, vec![EventType::QuestionAsked]);
        assert!(filter.from.is_some());
        assert!(filter.to.is_none());
        assert_eq!(filter.topic, Some(TopicPattern::Subtree("/team".into())));
    }

    #[test]
    fn monitor_rejects_bad_inputs() {
        let bad_type = MonitorRequest {
            event_types: Some(vec!["entry_deleted".into()]),
            actor: "alice".into(),
            ..Default::default()
        };
        assert!(bad_type.to_filter().is_err());

        let bad_time = MonitorRequest {
            from: Some("yesterday".into()),
            actor: "alice".into(),
            ..Default::default()
        };
        assert!(bad_time.to_filter().is_err());

        let no_actor = MonitorRequest::default();
        assert!(no_actor.to_filter().is_err());
    }
}
