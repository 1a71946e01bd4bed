use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTopicsParams {
    #[schemars(description = "Optional topic path; only topics under it are listed")]
    pub prefix: Option<String>,
}
