//! Entry selection for answering a question.
//!
//! The question text plays no part here. Everything under the topic that the
//! actor may read goes to the synthesizer, which decides relevance.

use crate::error::Result;
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::Entry;
use crate::store::Store;

/// Entries under `topic` readable by `actor`, newest first.
pub fn fetch_for_question(store: &dyn Store, topic: &TopicPattern, actor: &str) -> Result<Vec<Entry>> {
    store.get_entries_by_topic(topic, actor)
}
