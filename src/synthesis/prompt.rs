//! Prompt construction and response parsing shared by the remote providers.
//!
//! The model is asked to reply as
//!
//! ```text
//! ANSWER: <answer>
//! FOLLOWUPS: <question> | <question>
//! ```
//!
//! and [`parse_generation`] reads that shape back. Output without the
//! `ANSWER:` marker is taken whole as the answer.

use super::Generation;
use crate::knowledge::types::Entry;

pub const ANSWER_MARKER: &str = "ANSWER:";
pub const FOLLOWUPS_MARKER: &str = "FOLLOWUPS:";

/// Number each entry from 1, in retrieval order. The number is the citation key.
pub fn build_context(entries: &[Entry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "[{}] Topic: {}\nType: {}\n{}",
                i + 1,
                e.topic,
                e.entry_type,
                e.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn build_prompt(question: &str, entries: &[Entry]) -> String {
    format!(
        "You are a knowledge assistant. Answer the question below using only the knowledge entries provided.

Available entries:
{context}

Question: {question}

Rules:
- Answer only from the entries above
- Do not add anything that is not in them
- Cite sources as [1], [2], etc.
- If the entries cannot answer the question, say so plainly
- Suggest 1-2 follow-up questions if relevant

Reply in this format:
{ANSWER_MARKER} <your answer>
{FOLLOWUPS_MARKER} <follow-up 1> | <follow-up 2>",
        context = build_context(entries),
    )
}

/// Split model output into answer and followups.
pub fn parse_generation(text: &str) -> Generation {
    let answer = match text.find(ANSWER_MARKER) {
        Some(start) => {
            let rest = &text[start + ANSWER_MARKER.len()..];
            let end = rest
                .find(&format!("\n{FOLLOWUPS_MARKER}"))
                .unwrap_or(rest.len());
            rest[..end].trim().to_string()
        }
        None => text.to_string(),
    };

    let followups = text.find(FOLLOWUPS_MARKER).and_then(|start| {
        let line = text[start + FOLLOWUPS_MARKER.len()..]
            .lines()
            .next()
            .unwrap_or_default();
        let items: Vec<String> = line
            .split('|')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        (!items.is_empty()).then_some(items)
    });

    Generation { answer, followups }
}
