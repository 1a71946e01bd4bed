use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchEntriesParams {
    #[schemars(description = "Topic path or '*' prefix pattern to search under")]
    pub topic: String,

    #[schemars(description = "Case-sensitive text to find in entry content or tags")]
    pub query: String,

    #[schemars(description = "Who is searching. Only entries this actor may read are returned")]
    pub actor: String,
}
