//! CLI `put` and `confirm` commands.

use anyhow::Result;
use silbenkling::config::SilbenklingConfig;
use silbenkling::knowledge::requests::{ConfirmRequest, PutRequest};

pub async fn put(
    config: &SilbenklingConfig,
    topic: String,
    entry_type: String,
    tags: Vec<String>,
    actor: String,
    content: String,
) -> Result<()> {
    let engine = super::open_engine(config)?;
    let entry = engine
        .put_entry(PutRequest {
            topic,
            entry_type,
            content,
            tags,
            context: None,
            actor,
        })
        .await?;

    println!("Stored {} [{}] under {}", entry.id, entry.entry_type, entry.topic);
    Ok(())
}

pub async fn confirm(
    config: &SilbenklingConfig,
    topic: String,
    question: String,
    answer: String,
    actor: String,
) -> Result<()> {
    let engine = super::open_engine(config)?;
    let entry = engine
        .confirm_answer(ConfirmRequest {
            question,
            answer,
            topic,
            actor,
        })
        .await?;

    println!("Confirmed as qa entry {} under {}", entry.id, entry.topic);
    Ok(())
}
