//! Event recording shared by every flow that changes or queries knowledge.

use serde_json::Value;

use super::Engine;
use crate::error::Result;
use crate::knowledge::types::{payload, Event, EventType};

impl Engine {
    /// Append one event to the log and return it.
    pub(crate) async fn record(
        &self,
        event_type: EventType,
        actor: &str,
        topic: &str,
        entry_id: Option<&str>,
        details: Value,
    ) -> Result<Event> {
        let event = Event::new(event_type, actor, topic, entry_id, payload(details));
        let stored = event.clone();
        self.with_store(move |store| store.insert_event(&stored)).await?;

        tracing::debug!(
            event = %event.event_type,
            actor = %event.actor,
            topic = %event.topic,
            "event recorded"
        );
        Ok(event)
    }
}
