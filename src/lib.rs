//! Topic-scoped knowledge store with grounded question answering.
//!
//! Silbenkling keeps short knowledge items ("entries") filed under
//! hierarchical topic paths such as `/team/onboarding`, answers questions from
//! the entries under a topic, and records every ingestion and question in an
//! append-only event log that can be queried back with per-type counts.
//!
//! | Operation | Effect | Events |
//! |-----------|--------|--------|
//! | **put** | Store an entry | `entry_added` |
//! | **ask** | Answer from entries under a topic | `question_asked`, then `question_answered` or `question_unanswered` |
//! | **confirm** | Keep a Q/A pair as a `qa` entry | `entry_added`, `qa_confirmed` |
//! | **monitor** | Query the caller's events | none |
//!
//! # Architecture
//!
//! - **Storage**: SQLite (default) or an in-process store, behind the
//!   [`store::Store`] trait
//! - **Synthesis**: Anthropic or OpenAI chat APIs, or a deterministic
//!   offline fallback that quotes entries
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP, plus a CLI
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`engine`]: Request flows (ingest, ask, confirm, monitor) over store and synthesizer
//! - [`error`]: Error taxonomy shared by every layer
//! - [`knowledge`]: Entries, events, topic patterns, request and response shapes
//! - [`store`]: Persistence contract and its backends
//! - [`synthesis`]: Prompt construction and generation providers

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod store;
pub mod synthesis;
