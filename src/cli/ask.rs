use anyhow::Result;
use silbenkling::config::SilbenklingConfig;
use silbenkling::knowledge::requests::AskRequest;

/// Ask a question from the terminal and print the answer with its sources.
pub async fn ask(
    config: &SilbenklingConfig,
    topic: String,
    question: String,
    actor: String,
) -> Result<()> {
    let engine = super::open_engine(config)?;
    let response = engine
        .ask(AskRequest {
            question,
            topic,
            actor,
        })
        .await?;

    println!("{}", response.answer);

    if !response.sources.is_empty() {
        println!();
        println!("Sources:");
        for (i, source) in response.sources.iter().enumerate() {
            println!(
                "  [{}] {} ({}, {})",
                i + 1,
                source.entry_id,
                source.entry_type,
                source.topic
            );
            println!("      {}", super::preview(&source.excerpt, 120));
        }
    }

    if let Some(followups) = response.followups.filter(|f| !f.is_empty()) {
        println!();
        println!("Follow-up questions:");
        for q in followups {
            println!("  - {q}");
        }
    }

    Ok(())
}
