//! Anthropic Messages API provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::{build_prompt, parse_generation};
use super::{Generation, GenerationProvider};
use crate::error::{KnowledgeError, Result};
use crate::knowledge::types::Entry;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        max_tokens: u32,
    ) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client,
            endpoint: format!("{}/v1/messages", base.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
        }
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
    async fn generate(&self, question: &str, entries: &[Entry]) -> Result<Generation> {
        let prompt = build_prompt(question, entries);
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::generation(format!(
                "Anthropic API error {status}: {body}"
            )));
        }

        let result: MessagesResponse = response.json().await?;
        let text = result
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| KnowledgeError::generation("Anthropic response contained no text"))?;

        tracing::debug!(model = %self.model, chars = text.len(), "anthropic answer received");
        Ok(parse_generation(&text))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
