//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};
use silbenkling::config::SilbenklingConfig;
use silbenkling::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &SilbenklingConfig) -> Result<()> {
    println!("Silbenkling Health Report");
    println!("=========================");
    println!();
    println!("Storage backend:   {}", config.storage.backend);
    println!("Generation:        {}", config.generation.provider);

    if config.storage.backend != "sqlite" {
        println!();
        println!("Nothing to check: the {} backend keeps no files.", config.storage.backend);
        return Ok(());
    }

    let db_path = config.resolved_db_path();
    if !db_path.exists() {
        println!("Database:          not found at {}", db_path.display());
        println!("Run `silbenkling serve` or `silbenkling put` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Entries:         {}", report.entry_count);
    println!("  Events:          {}", report.event_count);
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Stop any running server.");
        println!("  2. Restore from a backup: cp backup.db {}", db_path.display());
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
