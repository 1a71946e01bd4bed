//! SQL DDL for the embedded backend.
//!
//! Defines the `entries`, `events`, and `schema_meta` tables. All DDL uses
//! `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements.
const SCHEMA_SQL: &str = r#"
-- Knowledge entries (append-only)
CREATE TABLE IF NOT EXISTS entries (
    id TEXT PRIMARY KEY,
    topic TEXT NOT NULL,
    type TEXT NOT NULL CHECK(type IN ('doc','qa','fact','task','link','event')),
    content TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]',
    context TEXT,
    created_at TEXT NOT NULL,
    created_by TEXT NOT NULL,
    read_permissions TEXT NOT NULL DEFAULT '[]',
    write_permissions TEXT NOT NULL DEFAULT '[]',
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_entries_topic ON entries(topic);
CREATE INDEX IF NOT EXISTS idx_entries_created ON entries(created_at);

-- Activity log (append-only). entry_id is advisory, no foreign key.
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL CHECK(type IN (
        'entry_added','entry_updated','question_asked','question_answered',
        'question_unanswered','qa_confirmed','access_denied'
    )),
    timestamp TEXT NOT NULL,
    actor TEXT NOT NULL,
    topic TEXT NOT NULL,
    entry_id TEXT,
    payload TEXT
);

CREATE INDEX IF NOT EXISTS idx_events_type ON events(type);
CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);
CREATE INDEX IF NOT EXISTS idx_events_topic ON events(topic);
CREATE INDEX IF NOT EXISTS idx_events_actor_timestamp ON events(actor, timestamp);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
