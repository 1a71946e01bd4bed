//! CLI `monitor` command: the caller's events with per-type counts.

use anyhow::Result;
use silbenkling::config::SilbenklingConfig;
use silbenkling::knowledge::requests::MonitorRequest;

pub async fn monitor(config: &SilbenklingConfig, req: MonitorRequest, json: bool) -> Result<()> {
    let engine = super::open_engine(config)?;
    let response = engine.monitor(req).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.events.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    for event in &response.events {
        println!(
            "  {}  {:<20} {}{}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.event_type.as_str(),
            event.topic,
            event
                .entry_id
                .as_deref()
                .map(|id| format!("  ({id})"))
                .unwrap_or_default()
        );
    }

    println!();
    println!("Total: {}", response.summary.total);
    for (event_type, count) in &response.summary.by_type {
        if *count > 0 {
            println!("  {:<20} {}", event_type.as_str(), count);
        }
    }

    Ok(())
}
