//! Deterministic provider for deployments without a model configured.
//!
//! Quotes the first few entries instead of synthesizing, so its output is
//! stable and tests can run the full question flow without a network.

use async_trait::async_trait;

use super::{Generation, GenerationProvider, NO_ENTRIES_ANSWER};
use crate::error::Result;
use crate::knowledge::truncate_chars;
use crate::knowledge::types::Entry;

/// Entries quoted in a fallback answer.
pub const QUOTED_ENTRIES: usize = 3;

/// Characters quoted from each entry.
pub const QUOTE_CHARS: usize = 200;

pub const FALLBACK_NOTE: &str =
    "(Fallback mode: configure a generation provider for synthesized answers.)";

pub struct FallbackProvider;

#[async_trait]
impl GenerationProvider for FallbackProvider {
    async fn generate(&self, _question: &str, entries: &[Entry]) -> Result<Generation> {
        let Some(first) = entries.first() else {
            return Ok(Generation {
                answer: NO_ENTRIES_ANSWER.to_string(),
                followups: None,
            });
        };

        let mut answer = String::from("Based on the stored entries:\n\n");
        for (i, entry) in entries.iter().take(QUOTED_ENTRIES).enumerate() {
            answer.push_str(&format!(
                "[{}] {}\n\n",
                i + 1,
                truncate_chars(&entry.content, QUOTE_CHARS)
            ));
        }
        answer.push_str(FALLBACK_NOTE);

        let followups = (entries.len() > 1).then(|| {
            vec![
                format!("What else is there on {}?", first.topic),
                "Can you give more details?".to_string(),
            ]
        });

        Ok(Generation { answer, followups })
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
