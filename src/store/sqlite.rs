//! Embedded SQLite backend.
//!
//! One connection behind a mutex. Every statement runs in autocommit, so an
//! insert is on disk before the call returns. All filter values are bound
//! parameters; topics are compared with `substr` rather than `LIKE` so `%`
//! and `_` in a topic stay literal.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use super::{Store, EVENT_LIMIT, SEARCH_LIMIT};
use crate::db::{self, HealthReport};
use crate::error::{KnowledgeError, Result};
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::{
    format_timestamp, parse_timestamp, Entry, EntryType, Event, EventFilter, Metadata,
    Permissions,
};

const ENTRY_COLUMNS: &str = "id, topic, type, content, tags, context, created_at, created_by, \
                             read_permissions, write_permissions, version";

const EVENT_COLUMNS: &str = "id, type, timestamp, actor, topic, entry_id, payload";

/// Topic bound to `?1`/`?2`, actor to `?3`.
const TOPIC_AND_READER: &str = "(topic = ?1 OR substr(topic, 1, length(?2)) = ?2) \
     AND (read_permissions = '[]' \
          OR EXISTS (SELECT 1 FROM json_each(entries.read_permissions) WHERE json_each.value = ?3))";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::from_connection(db::open_database(path)?))
    }

    /// A private in-memory SQLite database; useful for tests.
    pub fn in_memory() -> anyhow::Result<Self> {
        Ok(Self::from_connection(db::open_in_memory()?))
    }

    /// Wrap a connection that already has the schema applied.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn health(&self) -> anyhow::Result<HealthReport> {
        let conn = self.lock()?;
        db::check_database_health(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KnowledgeError::storage(format!("db lock poisoned: {e}")))
    }
}

impl Store for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn insert_entry(&self, entry: &Entry) -> Result<()> {
        let tags = serde_json::to_string(&entry.metadata.tags)?;
        let context = entry
            .metadata
            .context
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let read = serde_json::to_string(&entry.permissions.read)?;
        let write = serde_json::to_string(&entry.permissions.write)?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO entries (id, topic, type, content, tags, context, created_at, created_by, \
             read_permissions, write_permissions, version) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                entry.id,
                entry.topic,
                entry.entry_type.as_str(),
                entry.content,
                tags,
                context,
                format_timestamp(&entry.metadata.created_at),
                entry.metadata.created_by,
                read,
                write,
                entry.version,
            ],
        )?;
        Ok(())
    }

    fn insert_event(&self, event: &Event) -> Result<()> {
        let payload = event
            .payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO events (id, type, timestamp, actor, topic, entry_id, payload) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.id,
                event.event_type.as_str(),
                format_timestamp(&event.timestamp),
                event.actor,
                event.topic,
                event.entry_id,
                payload,
            ],
        )?;
        Ok(())
    }

    fn search_entries(&self, topic: &TopicPattern, query: &str, actor: &str) -> Result<Vec<Entry>> {
        let (exact, prefix) = topic.bounds();
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries \
             WHERE {TOPIC_AND_READER} \
               AND (instr(content, ?4) > 0 \
                    OR EXISTS (SELECT 1 FROM json_each(entries.tags) WHERE instr(json_each.value, ?4) > 0)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?5"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![exact, prefix, actor, query, SEARCH_LIMIT as i64],
                EntryRow::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        tracing::debug!(topic = %topic, matched = rows.len(), "search_entries");
        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    fn get_entries_by_topic(&self, topic: &TopicPattern, actor: &str) -> Result<Vec<Entry>> {
        let (exact, prefix) = topic.bounds();
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM entries \
             WHERE {TOPIC_AND_READER} \
             ORDER BY created_at DESC, id DESC"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![exact, prefix, actor], EntryRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        tracing::debug!(topic = %topic, matched = rows.len(), "get_entries_by_topic");
        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    fn get_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(ref topic) = filter.topic {
            let (exact, prefix) = topic.bounds();
            values.push(exact.into());
            let a = values.len();
            values.push(prefix.into());
            let b = values.len();
            clauses.push(format!("(topic = ?{a} OR substr(topic, 1, length(?{b})) = ?{b})"));
        }

        if !filter.types.is_empty() {
            let mut slots = Vec::with_capacity(filter.types.len());
            for t in &filter.types {
                values.push(t.as_str().to_string().into());
                slots.push(format!("?{}", values.len()));
            }
            clauses.push(format!("type IN ({})", slots.join(", ")));
        }

        let (from, to) = filter.time_bounds();
        if let Some(ref from) = from {
            values.push(format_timestamp(from).into());
            clauses.push(format!("timestamp >= ?{}", values.len()));
        }

        if let Some(ref to) = to {
            values.push(format_timestamp(to).into());
            clauses.push(format!("timestamp <= ?{}", values.len()));
        }

        if let Some(ref actor) = filter.actor {
            values.push(actor.clone().into());
            clauses.push(format!("actor = ?{}", values.len()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        values.push(Value::Integer(EVENT_LIMIT as i64));
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events {where_clause} \
             ORDER BY timestamp DESC, id DESC LIMIT ?{}",
            values.len()
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), EventRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        tracing::debug!(matched = rows.len(), "get_events");
        rows.into_iter().map(EventRow::into_event).collect()
    }

    fn list_topics(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT topic FROM entries ORDER BY topic ASC")?;
        let topics = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(topics)
    }

    fn list_entry_types(&self) -> Result<Vec<EntryType>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT DISTINCT type FROM entries ORDER BY type ASC")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        names
            .iter()
            .map(|n| n.parse::<EntryType>().map_err(KnowledgeError::Storage))
            .collect()
    }
}

// ── Row decoding ──────────────────────────────────────────────────────────────

/// Raw `entries` row; JSON columns are decoded outside the rusqlite closure.
struct EntryRow {
    id: String,
    topic: String,
    entry_type: String,
    content: String,
    tags: String,
    context: Option<String>,
    created_at: String,
    created_by: String,
    read_permissions: String,
    write_permissions: String,
    version: u32,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            topic: row.get(1)?,
            entry_type: row.get(2)?,
            content: row.get(3)?,
            tags: row.get(4)?,
            context: row.get(5)?,
            created_at: row.get(6)?,
            created_by: row.get(7)?,
            read_permissions: row.get(8)?,
            write_permissions: row.get(9)?,
            version: row.get(10)?,
        })
    }

    fn into_entry(self) -> Result<Entry> {
        Ok(Entry {
            entry_type: self.entry_type.parse().map_err(KnowledgeError::Storage)?,
            metadata: Metadata {
                tags: serde_json::from_str(&self.tags)?,
                created_at: decode_timestamp(&self.created_at)?,
                created_by: self.created_by,
                context: self.context.as_deref().map(serde_json::from_str).transpose()?,
            },
            permissions: Permissions {
                read: serde_json::from_str(&self.read_permissions)?,
                write: serde_json::from_str(&self.write_permissions)?,
            },
            id: self.id,
            topic: self.topic,
            content: self.content,
            version: self.version,
        })
    }
}

struct EventRow {
    id: String,
    event_type: String,
    timestamp: String,
    actor: String,
    topic: String,
    entry_id: Option<String>,
    payload: Option<String>,
}

impl EventRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            event_type: row.get(1)?,
            timestamp: row.get(2)?,
            actor: row.get(3)?,
            topic: row.get(4)?,
            entry_id: row.get(5)?,
            payload: row.get(6)?,
        })
    }

    fn into_event(self) -> Result<Event> {
        Ok(Event {
            event_type: self.event_type.parse().map_err(KnowledgeError::Storage)?,
            timestamp: decode_timestamp(&self.timestamp)?,
            payload: self.payload.as_deref().map(serde_json::from_str).transpose()?,
            id: self.id,
            actor: self.actor,
            topic: self.topic,
            entry_id: self.entry_id,
        })
    }
}

fn decode_timestamp(raw: &str) -> Result<chrono::DateTime<chrono::Utc>> {
    parse_timestamp(raw)
        .map_err(|e| KnowledgeError::storage(format!("bad stored timestamp {raw:?}: {e}")))
}
