pub mod ask;
pub mod doctor;
pub mod monitor;
pub mod put;
pub mod search;
pub mod topics;

use anyhow::Result;
use silbenkling::config::SilbenklingConfig;
use silbenkling::engine::Engine;

/// Engine for a one-shot CLI command.
fn open_engine(config: &SilbenklingConfig) -> Result<Engine> {
    Engine::from_config(config)
}

/// First `max_chars` characters of `text` on a single line.
fn preview(text: &str, max_chars: usize) -> String {
    silbenkling::knowledge::truncate_chars(&text.replace('\n', " "), max_chars)
}
