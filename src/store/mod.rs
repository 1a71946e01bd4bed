//! Persistence contract for entries and events.
//!
//! [`Store`] is implemented by [`sqlite::SqliteStore`] (embedded, file-backed)
//! and [`memory::MemoryStore`] (process-local). The backend is chosen once at
//! startup by [`create_store`]; nothing past that point knows which one it has.
//!
//! All methods are synchronous. Callers in async contexts should use
//! `tokio::task::spawn_blocking`.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::error::Result;
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::{Entry, EntryType, Event, EventFilter};

/// Maximum results from [`Store::search_entries`].
pub const SEARCH_LIMIT: usize = 10;

/// Maximum results from [`Store::get_events`].
pub const EVENT_LIMIT: usize = 100;

pub trait Store: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn backend(&self) -> &'static str;

    /// Persist an entry. Duplicate ids fail with a storage error.
    fn insert_entry(&self, entry: &Entry) -> Result<()>;

    /// Append an event to the log. Duplicate ids fail with a storage error.
    fn insert_event(&self, event: &Event) -> Result<()>;

    /// Entries under `topic`, readable by `actor`, whose content or any tag
    /// contains `query` (case-sensitive). Newest first, at most [`SEARCH_LIMIT`].
    fn search_entries(&self, topic: &TopicPattern, query: &str, actor: &str) -> Result<Vec<Entry>>;

    /// Every entry under `topic` readable by `actor`, newest first.
    fn get_entries_by_topic(&self, topic: &TopicPattern, actor: &str) -> Result<Vec<Entry>>;

    /// Events matching `filter`, newest first, at most [`EVENT_LIMIT`].
    fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    /// Distinct entry topics, ascending.
    fn list_topics(&self) -> Result<Vec<String>>;

    /// Distinct entry types present, ascending by name.
    fn list_entry_types(&self) -> Result<Vec<EntryType>>;
}

/// Create the configured store backend.
pub fn create_store(config: &StorageConfig, db_path: &std::path::Path) -> anyhow::Result<Arc<dyn Store>> {
    match config.backend.as_str() {
        "sqlite" => {
            let store = sqlite::SqliteStore::open(db_path)?;
            Ok(Arc::new(store))
        }
        "memory" => {
            tracing::warn!("memory backend selected, nothing will survive a restart");
            Ok(Arc::new(memory::MemoryStore::new()))
        }
        other => anyhow::bail!("unknown storage backend: {other}. Supported: sqlite, memory"),
    }
}
