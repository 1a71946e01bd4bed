//! In-process backend. Same contract as the SQLite store, nothing persisted.

use std::collections::{BTreeSet, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Store, EVENT_LIMIT, SEARCH_LIMIT};
use crate::error::{KnowledgeError, Result};
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::{Entry, EntryType, Event, EventFilter};

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    events: Vec<Event>,
    entry_ids: HashSet<String>,
    event_ids: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| KnowledgeError::storage(format!("store lock poisoned: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| KnowledgeError::storage(format!("store lock poisoned: {e}")))
    }

    fn visible<'a>(
        state: &'a State,
        topic: &'a TopicPattern,
        actor: &'a str,
    ) -> impl Iterator<Item = &'a Entry> + 'a {
        state
            .entries
            .iter()
            .filter(move |e| topic.matches(&e.topic) && e.permissions.can_read(actor))
    }
}

/// Newest first; ties broken by id, matching the SQLite ordering.
fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        (&b.metadata.created_at, &b.id).cmp(&(&a.metadata.created_at, &a.id))
    });
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn insert_entry(&self, entry: &Entry) -> Result<()> {
        let mut state = self.write()?;
        if !state.entry_ids.insert(entry.id.clone()) {
            return Err(KnowledgeError::storage(format!(
                "duplicate entry id: {}",
                entry.id
            )));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    fn insert_event(&self, event: &Event) -> Result<()> {
        let mut state = self.write()?;
        if !state.event_ids.insert(event.id.clone()) {
            return Err(KnowledgeError::storage(format!(
                "duplicate event id: {}",
                event.id
            )));
        }
        state.events.push(event.clone());
        Ok(())
    }

    fn search_entries(&self, topic: &TopicPattern, query: &str, actor: &str) -> Result<Vec<Entry>> {
        let state = self.read()?;
        let mut found: Vec<Entry> = Self::visible(&state, topic, actor)
            .filter(|e| e.content.contains(query) || e.metadata.tags.iter().any(|t| t.contains(query)))
            .cloned()
            .collect();
        sort_entries(&mut found);
        found.truncate(SEARCH_LIMIT);
        Ok(found)
    }

    fn get_entries_by_topic(&self, topic: &TopicPattern, actor: &str) -> Result<Vec<Entry>> {
        let state = self.read()?;
        let mut found: Vec<Entry> = Self::visible(&state, topic, actor).cloned().collect();
        sort_entries(&mut found);
        Ok(found)
    }

    fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let state = self.read()?;
        let mut found: Vec<Event> = state
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.timestamp, &b.id).cmp(&(a.timestamp, &a.id)));
        found.truncate(EVENT_LIMIT);
        Ok(found)
    }

    fn list_topics(&self) -> Result<Vec<String>> {
        let state = self.read()?;
        let topics: BTreeSet<&str> = state.entries.iter().map(|e| e.topic.as_str()).collect();
        Ok(topics.into_iter().map(str::to_string).collect())
    }

    fn list_entry_types(&self) -> Result<Vec<EntryType>> {
        let state = self.read()?;
        let mut types: Vec<EntryType> = state
            .entries
            .iter()
            .map(|e| e.entry_type)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        types.sort_by_key(|t| t.as_str());
        Ok(types)
    }
}
