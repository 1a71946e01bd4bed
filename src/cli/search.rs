use anyhow::Result;
use silbenkling::config::SilbenklingConfig;

/// Run a substring search from the terminal.
pub async fn search(config: &SilbenklingConfig, topic: &str, query: &str, actor: &str) -> Result<()> {
    let engine = super::open_engine(config)?;
    let entries = engine.search(topic, query, actor).await?;

    if entries.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", entries.len());

    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {}. [{}] {} {} ({})",
            i + 1,
            entry.entry_type,
            entry.id,
            entry.topic,
            entry.metadata.created_at.format("%Y-%m-%d %H:%M"),
        );
        println!("     {}", super::preview(&entry.content, 120));
        if !entry.metadata.tags.is_empty() {
            println!("     tags: {}", entry.metadata.tags.join(", "));
        }
        println!();
    }

    Ok(())
}
