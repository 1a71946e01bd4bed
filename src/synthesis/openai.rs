//! OpenAI Chat Completions provider. Also works against compatible endpoints
//! via `base_url`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt::{build_prompt, parse_generation};
use super::{Generation, GenerationProvider};
use crate::error::{KnowledgeError, Result};
use crate::knowledge::types::Entry;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiProvider {
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
            endpoint: format!("{}/v1/chat/completions", base.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
        }
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn generate(&self, question: &str, entries: &[Entry]) -> Result<Generation> {
        let prompt = build_prompt(question, entries);
        let request = ChatRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KnowledgeError::generation(format!(
                "OpenAI API error {status}: {body}"
            )));
        }

        let result: ChatResponse = response.json().await?;
        let text = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| KnowledgeError::generation("OpenAI response contained no message"))?;

        tracing::debug!(model = %self.model, chars = text.len(), "openai answer received");
        Ok(parse_generation(&text))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
