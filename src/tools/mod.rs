pub mod ask_question;
pub mod confirm_answer;
pub mod list_topics;
pub mod monitor_events;
pub mod put_entry;
pub mod search_entries;

use std::sync::Arc;

use ask_question::AskQuestionParams;
use confirm_answer::ConfirmAnswerParams;
use list_topics::ListTopicsParams;
use monitor_events::MonitorEventsParams;
use put_entry::PutEntryParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use search_entries::SearchEntriesParams;
use serde::Serialize;
use silbenkling::engine::Engine;
use silbenkling::error::KnowledgeError;
use silbenkling::knowledge::requests::Source;

/// The Silbenkling MCP tool handler. Holds the shared [`Engine`] and exposes
/// every operation via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct KnowledgeTools {
    tool_router: ToolRouter<Self>,
    engine: Arc<Engine>,
}

#[tool_router]
impl KnowledgeTools {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            engine,
        }
    }

    #[tool(description = "Store a knowledge entry under a topic path. Types: doc, qa, fact, task, link, event.")]
    async fn put_entry(
        &self,
        Parameters(params): Parameters<PutEntryParams>,
    ) -> Result<String, String> {
        tracing::info!(topic = %params.topic, entry_type = %params.r#type, "put_entry called");

        let entry = self
            .engine
            .put_entry(params.into())
            .await
            .map_err(|e| tool_error("put_entry", e))?;

        to_json(&serde_json::json!({ "id": entry.id, "entry": entry }))
    }

    #[tool(description = "Answer a question using only the entries stored under a topic. Returns the answer, cited sources, and optional follow-up questions.")]
    async fn ask_question(
        &self,
        Parameters(params): Parameters<AskQuestionParams>,
    ) -> Result<String, String> {
        tracing::info!(topic = %params.topic, "ask_question called");

        let response = self
            .engine
            .ask(params.into())
            .await
            .map_err(|e| tool_error("ask_question", e))?;

        to_json(&response)
    }

    #[tool(description = "Keep a question and its answer as a qa entry so later questions can use it.")]
    async fn confirm_answer(
        &self,
        Parameters(params): Parameters<ConfirmAnswerParams>,
    ) -> Result<String, String> {
        tracing::info!(topic = %params.topic, "confirm_answer called");

        let entry = self
            .engine
            .confirm_answer(params.into())
            .await
            .map_err(|e| tool_error("confirm_answer", e))?;

        to_json(&serde_json::json!({ "id": entry.id, "entry": entry }))
    }

    #[tool(description = "List your own recorded events (newest first, up to 100) with counts per event type. Filter by topic, event types, and time range.")]
    async fn monitor_events(
        &self,
        Parameters(params): Parameters<MonitorEventsParams>,
    ) -> Result<String, String> {
        tracing::info!(actor = %params.actor, "monitor_events called");

        let response = self
            .engine
            .monitor(params.into())
            .await
            .map_err(|e| tool_error("monitor_events", e))?;

        to_json(&response)
    }

    #[tool(description = "List the topics that have entries and the entry types in use.")]
    async fn list_topics(
        &self,
        Parameters(params): Parameters<ListTopicsParams>,
    ) -> Result<String, String> {
        tracing::info!("list_topics called");

        let catalog = self
            .engine
            .catalog(params.prefix.as_deref())
            .await
            .map_err(|e| tool_error("list_topics", e))?;

        to_json(&catalog)
    }

    #[tool(description = "Find entries under a topic whose content or tags contain a piece of text (case-sensitive, newest first, up to 10).")]
    async fn search_entries(
        &self,
        Parameters(params): Parameters<SearchEntriesParams>,
    ) -> Result<String, String> {
        tracing::info!(topic = %params.topic, "search_entries called");

        let entries = self
            .engine
            .search(&params.topic, &params.query, &params.actor)
            .await
            .map_err(|e| tool_error("search_entries", e))?;

        let results: Vec<Source> = entries.iter().map(Source::from_entry).collect();
        to_json(&serde_json::json!({ "total": results.len(), "results": results }))
    }
}

#[tool_handler]
impl ServerHandler for KnowledgeTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Silbenkling is a topic-scoped knowledge store. Use put_entry to add knowledge, \
                 ask_question to get answers grounded in it, confirm_answer to keep good answers, \
                 and monitor_events to review your activity."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

/// Log the full error and hand back only what the caller may see.
fn tool_error(tool: &str, e: KnowledgeError) -> String {
    match &e {
        KnowledgeError::Validation(_) => tracing::warn!(tool, error = %e, "request rejected"),
        _ => tracing::error!(tool, error = %e, "request failed"),
    }
    e.public_message()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("serialization failed: {e}"))
}
