//! Question answering: record the question, gather entries, synthesize,
//! record the outcome.

use serde_json::json;

use super::{retrieval, Engine};
use crate::error::Result;
use crate::knowledge::requests::{AskRequest, AskResponse, Source};
use crate::knowledge::topic::TopicPattern;
use crate::knowledge::types::EventType;
use crate::synthesis::NO_ENTRIES_ANSWER;

impl Engine {
    /// Answer a question from the entries under a topic.
    ///
    /// Events: `question_asked`, then exactly one of `question_unanswered`
    /// (nothing readable under the topic) or `question_answered`. A failed
    /// generation leaves only `question_asked` behind.
    pub async fn ask(&self, req: AskRequest) -> Result<AskResponse> {
        req.validate()?;
        let actor = req.actor.trim().to_string();
        let topic = req.topic.trim().to_string();
        let pattern = TopicPattern::parse(&topic);

        self.record(
            EventType::QuestionAsked,
            &actor,
            &topic,
            None,
            json!({ "question": req.question }),
        )
        .await?;

        let entries = {
            let actor = actor.clone();
            let pattern = pattern.clone();
            self.with_store(move |store| retrieval::fetch_for_question(store, &pattern, &actor))
                .await?
        };

        if entries.is_empty() {
            self.record(
                EventType::QuestionUnanswered,
                &actor,
                &topic,
                None,
                json!({ "question": req.question }),
            )
            .await?;
            tracing::info!(%pattern, "no entries for question");
            return Ok(AskResponse {
                answer: NO_ENTRIES_ANSWER.to_string(),
                sources: Vec::new(),
                followups: None,
            });
        }

        let generation = self
            .synthesizer
            .generate(&req.question, &entries)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %pattern, "answer generation failed"))?;

        self.record(
            EventType::QuestionAnswered,
            &actor,
            &topic,
            None,
            json!({
                "question": req.question,
                "sources_count": entries.len(),
            }),
        )
        .await?;

        tracing::info!(%pattern, sources = entries.len(), "question answered");
        Ok(AskResponse {
            answer: generation.answer,
            sources: entries.iter().map(Source::from_entry).collect(),
            followups: generation.followups,
        })
    }
}
