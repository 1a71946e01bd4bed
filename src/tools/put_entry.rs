use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use silbenkling::knowledge::requests::PutRequest;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PutEntryParams {
    #[schemars(description = "Topic path the entry is filed under, e.g. '/team/onboarding'")]
    pub topic: String,

    #[schemars(description = "Entry type: 'doc', 'qa', 'fact', 'task', 'link', or 'event'")]
    pub r#type: String,

    #[schemars(description = "The knowledge itself, as plain text")]
    pub content: String,

    #[schemars(description = "Optional free-form tags")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Optional string key/value context, e.g. source or channel")]
    pub context: Option<BTreeMap<String, String>>,

    #[schemars(description = "Who is storing this entry")]
    pub actor: String,
}

impl From<PutEntryParams> for PutRequest {
    fn from(p: PutEntryParams) -> Self {
        Self {
            topic: p.topic,
            entry_type: p.r#type,
            content: p.content,
            tags: p.tags.unwrap_or_default(),
            context: p.context,
            actor: p.actor,
        }
    }
}
