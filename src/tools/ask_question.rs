use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use silbenkling::knowledge::requests::AskRequest;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AskQuestionParams {
    #[schemars(description = "The question to answer")]
    pub question: String,

    #[schemars(
        description = "Topic to answer from. '/team' covers /team and everything below it; '/team*' is a raw prefix that also covers '/teamwork'"
    )]
    pub topic: String,

    #[schemars(description = "Who is asking. Only entries this actor may read are used")]
    pub actor: String,
}

impl From<AskQuestionParams> for AskRequest {
    fn from(p: AskQuestionParams) -> Self {
        Self {
            question: p.question,
            topic: p.topic,
            actor: p.actor,
        }
    }
}
