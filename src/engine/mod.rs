//! The knowledge engine: one context object per process, shared by every
//! request.
//!
//! [`Engine`] owns the configured [`Store`] and [`Synthesizer`] and runs the
//! request flows:
//!
//! - [`Engine::put_entry`] and [`Engine::confirm_answer`]: ingestion
//! - [`Engine::ask`]: retrieval plus synthesis, with the question events
//! - [`Engine::monitor`]: filtered event log with per-type counts
//! - [`Engine::catalog`] and [`Engine::search`]: read-only lookups
//!
//! Each flow is a strict sequence of awaited steps; event order within a
//! request follows step order. Nothing is locked across requests.

pub mod ask;
pub mod ingest;
pub mod monitor;
pub mod recorder;
pub mod retrieval;

use std::sync::Arc;

use crate::config::SilbenklingConfig;
use crate::error::{KnowledgeError, Result};
use crate::store::{self, Store};
use crate::synthesis::{self, Synthesizer};

#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn Store>,
    synthesizer: Synthesizer,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>, synthesizer: Synthesizer) -> Self {
        Self { store, synthesizer }
    }

    /// Build the store and generation provider named in config.
    pub fn from_config(config: &SilbenklingConfig) -> anyhow::Result<Self> {
        let store = store::create_store(&config.storage, &config.resolved_db_path())?;
        let provider = synthesis::create_provider(&config.generation)?;
        let synthesizer = Synthesizer::new(provider);
        tracing::info!(
            backend = store.backend(),
            provider = synthesizer.provider_name(),
            "engine ready"
        );
        Ok(Self::new(store, synthesizer))
    }

    /// Run a store call on the blocking pool and wait for it.
    async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| KnowledgeError::storage(format!("store task failed: {e}")))?
    }
}
