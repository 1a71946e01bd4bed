//! Ingestion: validate, normalize, persist, record `entry_added`.

use serde_json::json;

use super::Engine;
use crate::error::{KnowledgeError, Result};
use crate::knowledge::requests::{ConfirmRequest, PutRequest};
use crate::knowledge::topic::{normalize_topic, WILDCARD};
use crate::knowledge::types::{new_id, now, Entry, EntryType, EventType, Metadata, Permissions};

/// Tag carried by entries created from confirmed answers.
pub const QA_TAG: &str = "qa";

impl Engine {
    /// Store a new knowledge item and record `entry_added`.
    pub async fn put_entry(&self, req: PutRequest) -> Result<Entry> {
        let entry = build_entry(req)?;

        let stored = entry.clone();
        self.with_store(move |store| store.insert_entry(&stored)).await?;

        self.record(
            EventType::EntryAdded,
            &entry.metadata.created_by,
            &entry.topic,
            Some(&entry.id),
            json!({
                "entry_type": entry.entry_type,
                "tags": entry.metadata.tags,
            }),
        )
        .await?;

        tracing::info!(
            id = %entry.id,
            topic = %entry.topic,
            entry_type = %entry.entry_type,
            "entry stored"
        );
        Ok(entry)
    }

    /// Keep a question/answer pair as a `qa` entry, then record `qa_confirmed`.
    pub async fn confirm_answer(&self, req: ConfirmRequest) -> Result<Entry> {
        req.validate()?;

        let entry = self
            .put_entry(PutRequest {
                topic: req.topic.clone(),
                entry_type: EntryType::Qa.as_str().to_string(),
                content: req.qa_content(),
                tags: vec![QA_TAG.to_string()],
                context: None,
                actor: req.actor.clone(),
            })
            .await?;

        self.record(
            EventType::QaConfirmed,
            &req.actor,
            &entry.topic,
            Some(&entry.id),
            json!({ "question": req.question }),
        )
        .await?;

        Ok(entry)
    }
}

/// Validate a request and turn it into a fresh, open-permission entry.
fn build_entry(req: PutRequest) -> Result<Entry> {
    let entry_type = req.validate()?;

    let topic = normalize_topic(&req.topic);
    if topic.ends_with(WILDCARD) {
        return Err(KnowledgeError::validation(format!(
            "topic must not end with '{WILDCARD}'"
        )));
    }

    let tags = req
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    Ok(Entry {
        id: new_id(),
        topic,
        entry_type,
        content: req.content,
        metadata: Metadata {
            tags,
            created_at: now(),
            created_by: req.actor.trim().to_string(),
            context: req.context,
        },
        permissions: Permissions::open(),
        version: 1,
    })
}
