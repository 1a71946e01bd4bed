use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use silbenkling::knowledge::requests::ConfirmRequest;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConfirmAnswerParams {
    #[schemars(description = "The question that was asked")]
    pub question: String,

    #[schemars(description = "The answer to keep")]
    pub answer: String,

    #[schemars(description = "Topic path to file the resulting qa entry under")]
    pub topic: String,

    #[schemars(description = "Who is confirming the answer")]
    pub actor: String,
}

impl From<ConfirmAnswerParams> for ConfirmRequest {
    fn from(p: ConfirmAnswerParams) -> Self {
        Self {
            question: p.question,
            answer: p.answer,
            topic: p.topic,
            actor: p.actor,
        }
    }
}
