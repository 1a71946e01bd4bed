#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use silbenkling::engine::Engine;
use silbenkling::error::{KnowledgeError, Result};
use silbenkling::knowledge::types::{
    new_id, now, Entry, EntryType, Event, EventType, Metadata, Permissions,
};
use silbenkling::store::memory::MemoryStore;
use silbenkling::store::sqlite::SqliteStore;
use silbenkling::store::Store;
use silbenkling::synthesis::{Generation, GenerationProvider, Synthesizer};

/// One fresh instance of every store backend.
pub fn backends() -> Vec<Arc<dyn Store>> {
    vec![
        Arc::new(SqliteStore::in_memory().unwrap()),
        Arc::new(MemoryStore::new()),
    ]
}

/// A fixed instant so tests can order entries and events explicitly.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// An open-permission entry created `minutes` after [`base_time`].
pub fn entry_at(topic: &str, content: &str, minutes: i64) -> Entry {
    Entry {
        id: new_id(),
        topic: topic.to_string(),
        entry_type: EntryType::Fact,
        content: content.to_string(),
        metadata: Metadata {
            tags: Vec::new(),
            created_at: base_time() + Duration::minutes(minutes),
            created_by: "alice".to_string(),
            context: None,
        },
        permissions: Permissions::open(),
        version: 1,
    }
}

pub fn entry(topic: &str, content: &str) -> Entry {
    let mut e = entry_at(topic, content, 0);
    e.metadata.created_at = now();
    e
}

/// Same entry, readable only by `readers`.
pub fn restricted(mut entry: Entry, readers: &[&str]) -> Entry {
    entry.permissions.read = readers.iter().map(|r| r.to_string()).collect::<BTreeSet<_>>();
    entry
}

pub fn event_at(event_type: EventType, actor: &str, topic: &str, minutes: i64) -> Event {
    let mut event = Event::new(event_type, actor, topic, None, None);
    event.timestamp = base_time() + Duration::minutes(minutes);
    event
}

/// Engine over `store` answering with the deterministic fallback.
pub fn fallback_engine(store: Arc<dyn Store>) -> Engine {
    Engine::new(store, Synthesizer::fallback())
}

pub fn engine_with(store: Arc<dyn Store>, provider: Arc<dyn GenerationProvider>) -> Engine {
    Engine::new(store, Synthesizer::new(provider))
}

/// Provider that remembers what it was asked and answers with a canned reply.
#[derive(Default)]
pub struct RecordingProvider {
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingProvider {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationProvider for RecordingProvider {
    async fn generate(&self, question: &str, entries: &[Entry]) -> Result<Generation> {
        let ids = entries.iter().map(|e| e.id.clone()).collect();
        self.calls.lock().unwrap().push((question.to_string(), ids));
        Ok(Generation {
            answer: "Standup is at 9:30 [1].".to_string(),
            followups: Some(vec!["Where is standup held?".to_string()]),
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Provider that always fails, as an unreachable endpoint would.
pub struct FailingProvider;

#[async_trait]
impl GenerationProvider for FailingProvider {
    async fn generate(&self, _question: &str, _entries: &[Entry]) -> Result<Generation> {
        Err(KnowledgeError::generation("connection refused"))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
