use anyhow::Result;
use silbenkling::config::SilbenklingConfig;

/// Print stored topics and entry types.
pub async fn topics(config: &SilbenklingConfig, prefix: Option<&str>) -> Result<()> {
    let engine = super::open_engine(config)?;
    let catalog = engine.catalog(prefix).await?;

    if catalog.topics.is_empty() {
        println!("No topics yet.");
        return Ok(());
    }

    println!("Topics ({}):", catalog.topics.len());
    for topic in &catalog.topics {
        println!("  {topic}");
    }

    let types: Vec<&str> = catalog.types.iter().map(|t| t.as_str()).collect();
    println!();
    println!("Entry types: {}", types.join(", "));
    Ok(())
}
