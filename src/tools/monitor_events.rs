use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use silbenkling::knowledge::requests::MonitorRequest;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MonitorEventsParams {
    #[schemars(description = "Optional topic path or '*' prefix pattern to restrict events to")]
    pub topic: Option<String>,

    #[schemars(
        description = "Optional event types: entry_added, entry_updated, question_asked, question_answered, question_unanswered, qa_confirmed, access_denied"
    )]
    pub event_types: Option<Vec<String>>,

    #[schemars(description = "Optional RFC 3339 lower bound on event time, inclusive")]
    pub from: Option<String>,

    #[schemars(description = "Optional RFC 3339 upper bound on event time, inclusive")]
    pub to: Option<String>,

    #[schemars(description = "Whose events to show. Only this actor's own events are returned")]
    pub actor: String,
}

impl From<MonitorEventsParams> for MonitorRequest {
    fn from(p: MonitorEventsParams) -> Self {
        Self {
            topic: p.topic,
            event_types: p.event_types,
            from: p.from,
            to: p.to,
            actor: p.actor,
        }
    }
}
