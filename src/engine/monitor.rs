//! Event log queries, the topic/type catalog, and substring search.

use std::collections::BTreeMap;

use super::Engine;
use crate::error::{KnowledgeError, Result};
use crate::knowledge::requests::{Catalog, MonitorRequest, MonitorResponse, MonitorSummary};
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::{Entry, Event, EventType};

impl Engine {
    /// The requesting actor's events matching the filter, newest first, with
    /// per-type counts over the returned events.
    pub async fn monitor(&self, req: MonitorRequest) -> Result<MonitorResponse> {
        let filter = req.to_filter()?;
        let events = self.with_store(move |store| store.get_events(&filter)).await?;
        tracing::debug!(actor = %req.actor, events = events.len(), "monitor query");
        Ok(summarize(events))
    }

    /// Distinct stored topics and entry types. With `prefix`, only topics it
    /// selects are listed.
    pub async fn catalog(&self, prefix: Option<&str>) -> Result<Catalog> {
        let pattern = prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(TopicPattern::parse);

        let (topics, types) = self
            .with_store(|store| Ok((store.list_topics()?, store.list_entry_types()?)))
            .await?;

        let topics = match pattern {
            Some(pattern) => topics.into_iter().filter(|t| pattern.matches(t)).collect(),
            None => topics,
        };
        Ok(Catalog { topics, types })
    }

    /// Entries under `topic` whose content or tags contain `query`.
    pub async fn search(&self, topic: &str, query: &str, actor: &str) -> Result<Vec<Entry>> {
        for (field, value) in [("topic", topic), ("query", query), ("actor", actor)] {
            if value.trim().is_empty() {
                return Err(KnowledgeError::validation(format!(
                    "missing required field: {field}"
                )));
            }
        }

        let pattern = TopicPattern::parse(topic);
        let query = query.to_string();
        let actor = actor.trim().to_string();
        self.with_store(move |store| store.search_entries(&pattern, &query, &actor))
            .await
    }
}

/// Wrap events with their totals. Every event type appears in `by_type`.
pub fn summarize(events: Vec<Event>) -> MonitorResponse {
    let mut by_type: BTreeMap<EventType, u64> =
        EventType::ALL.iter().map(|t| (*t, 0)).collect();
    for event in &events {
        *by_type.entry(event.event_type).or_insert(0) += 1;
    }

    MonitorResponse {
        summary: MonitorSummary {
            total: events.len() as u64,
            by_type,
        },
        events,
    }
}
