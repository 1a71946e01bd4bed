mod helpers;

use silbenkling::config::{SilbenklingConfig, StorageConfig};
use silbenkling::db;
use silbenkling::db::migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
use silbenkling::engine::Engine;
use silbenkling::knowledge::requests::PutRequest;
use silbenkling::knowledge::topic::TopicPattern;
use silbenkling::knowledge::types::{EventFilter, EventType};
use silbenkling::store::sqlite::SqliteStore;
use silbenkling::store::{create_store, Store};
use tempfile::TempDir;

#[test]
fn open_creates_new_db_at_nonexistent_path() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("knowledge.db");
    assert!(!db_path.exists());

    let conn = db::open_database(&db_path).unwrap();
    assert!(db_path.exists());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn pragmas_are_applied() {
    let tmp = TempDir::new().unwrap();
    let conn = db::open_database(tmp.path().join("k.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);

    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}

#[test]
fn reopening_migrates_nothing_twice() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("k.db");

    let conn = db::open_database(&db_path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    drop(conn);

    let mut conn = db::open_database(&db_path).unwrap();
    run_migrations(&mut conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn health_check_reports_counts() {
    let store = SqliteStore::in_memory().unwrap();
    store.insert_entry(&helpers::entry("/t", "one")).unwrap();
    store
        .insert_event(&helpers::event_at(EventType::EntryAdded, "alice", "/t", 0))
        .unwrap();
    store
        .insert_event(&helpers::event_at(EventType::QuestionAsked, "alice", "/t", 1))
        .unwrap();

    let report = store.health().unwrap();
    assert!(report.integrity_ok);
    assert_eq!(report.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(report.entry_count, 1);
    assert_eq!(report.event_count, 2);
}

#[test]
fn schema_rejects_unknown_types() {
    let conn = db::open_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO events (id, type, timestamp, actor, topic) VALUES ('x', 'entry_deleted', 't', 'a', '/')",
        [],
    );
    assert!(result.is_err());
}

#[test]
fn entries_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("k.db");
    let e = helpers::entry("/team", "Standup is at 9:30");

    {
        let store = SqliteStore::open(&db_path).unwrap();
        store.insert_entry(&e).unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let found = store
        .get_entries_by_topic(&TopicPattern::parse("/team"), "bob")
        .unwrap();
    assert_eq!(found, vec![e]);
}

#[test]
fn create_store_rejects_unknown_backend() {
    let tmp = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: "postgres".into(),
        ..Default::default()
    };
    let err = create_store(&config, &tmp.path().join("k.db")).err().unwrap();
    assert!(err.to_string().contains("unknown storage backend"));
}

#[tokio::test]
async fn engine_from_config_writes_to_configured_db() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("engine.db");

    let mut config = SilbenklingConfig::default();
    config.storage.db_path = db_path.to_string_lossy().into_owned();
    config.generation.provider = "fallback".into();

    let engine = Engine::from_config(&config).unwrap();
    engine
        .put_entry(PutRequest {
            topic: "/ops".into(),
            entry_type: "task".into(),
            content: "Rotate certificates".into(),
            tags: vec![],
            context: None,
            actor: "alice".into(),
        })
        .await
        .unwrap();
    drop(engine);

    let store = SqliteStore::open(&db_path).unwrap();
    assert_eq!(store.list_topics().unwrap(), vec!["/ops"]);
    let events = store.get_events(&EventFilter::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::EntryAdded);
}
