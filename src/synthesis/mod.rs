//! Grounded answer synthesis.
//!
//! A [`GenerationProvider`] turns a question plus retrieved entries into a
//! [`Generation`]. Providers are selected from configuration by
//! [`create_provider`]: the deterministic [`fallback::FallbackProvider`] needs
//! nothing external, while [`anthropic::AnthropicProvider`] and
//! [`openai::OpenAiProvider`] make one HTTP request per question.
//! [`Synthesizer`] wraps whichever provider is configured and answers the
//! empty-entries case itself, without calling out.

pub mod anthropic;
pub mod fallback;
pub mod openai;
pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::knowledge::types::Entry;

/// Answer given when nothing under the topic is visible to the asker.
pub const NO_ENTRIES_ANSWER: &str =
    "I found no matching entries for this question. Would you like to add some knowledge?";

/// Output of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followups: Option<Vec<String>>,
}

/// A pluggable answer generator.
///
/// Implementations receive a non-empty, already-ordered slice of entries; the
/// 1-based position of an entry is its citation key.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, question: &str, entries: &[Entry]) -> Result<Generation>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

/// Front door to the configured provider.
#[derive(Clone)]
pub struct Synthesizer {
    provider: Arc<dyn GenerationProvider>,
}

impl Synthesizer {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Synthesizer backed by the deterministic fallback.
    pub fn fallback() -> Self {
        Self::new(Arc::new(fallback::FallbackProvider))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generate a grounded answer. With no entries the fixed
    /// [`NO_ENTRIES_ANSWER`] comes back and the provider is not called.
    pub async fn generate(&self, question: &str, entries: &[Entry]) -> Result<Generation> {
        if entries.is_empty() {
            return Ok(Generation {
                answer: NO_ENTRIES_ANSWER.to_string(),
                followups: None,
            });
        }

        tracing::debug!(
            provider = self.provider.name(),
            entries = entries.len(),
            "generating answer"
        );
        self.provider.generate(question, entries).await
    }
}

/// Create a generation provider from config.
///
/// Remote providers take their key from `api_key`, falling back to
/// `ANTHROPIC_API_KEY` / `OPENAI_API_KEY`. A missing key is an error here,
/// at startup, rather than on the first question.
pub fn create_provider(config: &GenerationConfig) -> anyhow::Result<Arc<dyn GenerationProvider>> {
    match config.provider.as_str() {
        "fallback" => Ok(Arc::new(fallback::FallbackProvider)),
        "anthropic" => {
            let api_key = resolve_key(config, "ANTHROPIC_API_KEY")?;
            let provider = anthropic::AnthropicProvider::new(
                http_client(config)?,
                api_key,
                config.model.clone(),
                config.base_url.clone(),
                config.max_tokens,
            );
            Ok(Arc::new(provider))
        }
        "openai" => {
            let api_key = resolve_key(config, "OPENAI_API_KEY")?;
            let provider = openai::OpenAiProvider::new(
                http_client(config)?,
                api_key,
                config.model.clone(),
                config.base_url.clone(),
                config.max_tokens,
            );
            Ok(Arc::new(provider))
        }
        other => anyhow::bail!(
            "unknown generation provider: {other}. Supported: fallback, anthropic, openai"
        ),
    }
}

fn resolve_key(config: &GenerationConfig, env_var: &str) -> anyhow::Result<String> {
    config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.is_empty()))
        .with_context(|| format!("{env_var} not set"))
}

fn http_client(config: &GenerationConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnowledgeError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and always fails, so any call is visible.
    struct Tripwire(AtomicUsize);

    #[async_trait]
    impl GenerationProvider for Tripwire {
        async fn generate(&self, _question: &str, _entries: &[Entry]) -> Result<Generation> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(KnowledgeError::generation("should not be called"))
        }

        fn name(&self) -> &'static str {
            "tripwire"
        }
    }

    #[tokio::test]
    async fn empty_entries_skip_the_provider() {
        let tripwire = Arc::new(Tripwire(AtomicUsize::new(0)));
        let synth = Synthesizer::new(tripwire.clone());

        let generation = synth.generate("anything?", &[]).await.unwrap();

        assert_eq!(generation.answer, NO_ENTRIES_ANSWER);
        assert!(generation.followups.is_none());
        assert_eq!(tripwire.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fallback_needs_no_key() {
        let provider = create_provider(&GenerationConfig::default()).unwrap();
        assert_eq!(provider.name(), "fallback");
    }

    #[test]
    fn configured_key_builds_remote_providers() {
        let mut config = GenerationConfig {
            provider: "anthropic".into(),
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert_eq!(create_provider(&config).unwrap().name(), "anthropic");

        config.provider = "openai".into();
        assert_eq!(create_provider(&config).unwrap().name(), "openai");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = GenerationConfig {
            provider: "oracle".into(),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("unknown generation provider"));
    }
}
