mod cli;
mod server;
mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use silbenkling::config::SilbenklingConfig;

#[derive(Parser)]
#[command(name = "silbenkling", version, about = "Topic-scoped knowledge store with grounded answers")]
struct Cli {
    /// Config file (default: ~/.silbenkling/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio unless --http)
    Serve {
        /// Serve Streamable HTTP on the configured host and port
        #[arg(long)]
        http: bool,
    },
    /// Store a knowledge entry
    Put {
        /// Topic path, e.g. /team/onboarding
        #[arg(long)]
        topic: String,
        /// Entry type: doc, qa, fact, task, link, event
        #[arg(long = "type", default_value = "fact")]
        entry_type: String,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, env = "USER", default_value = "cli")]
        actor: String,
        content: String,
    },
    /// Ask a question against a topic
    Ask {
        /// Topic path or prefix pattern ending in '*'
        #[arg(long)]
        topic: String,
        #[arg(long, env = "USER", default_value = "cli")]
        actor: String,
        question: String,
    },
    /// Keep a question and its answer as a qa entry
    Confirm {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long, env = "USER", default_value = "cli")]
        actor: String,
    },
    /// Show your recorded events with per-type counts
    Monitor {
        #[arg(long)]
        topic: Option<String>,
        /// Event type (repeatable)
        #[arg(long = "type")]
        event_types: Vec<String>,
        /// RFC 3339 lower bound, inclusive
        #[arg(long)]
        from: Option<String>,
        /// RFC 3339 upper bound, inclusive
        #[arg(long)]
        to: Option<String>,
        #[arg(long, env = "USER", default_value = "cli")]
        actor: String,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List stored topics and entry types
    Topics {
        /// Only topics under this path
        prefix: Option<String>,
    },
    /// Substring search over entry content and tags
    Search {
        #[arg(long, default_value = "/")]
        topic: String,
        #[arg(long, env = "USER", default_value = "cli")]
        actor: String,
        query: String,
    },
    /// Run database diagnostics
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SilbenklingConfig::load_from(path)?,
        None => SilbenklingConfig::load()?,
    };

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Put {
            topic,
            entry_type,
            tags,
            actor,
            content,
        } => cli::put::put(&config, topic, entry_type, tags, actor, content).await?,
        Command::Ask {
            topic,
            actor,
            question,
        } => cli::ask::ask(&config, topic, question, actor).await?,
        Command::Confirm {
            topic,
            question,
            answer,
            actor,
        } => cli::put::confirm(&config, topic, question, answer, actor).await?,
        Command::Monitor {
            topic,
            event_types,
            from,
            to,
            actor,
            json,
        } => {
            let req = silbenkling::knowledge::requests::MonitorRequest {
                topic,
                event_types: (!event_types.is_empty()).then_some(event_types),
                from,
                to,
                actor,
            };
            cli::monitor::monitor(&config, req, json).await?
        }
        Command::Topics { prefix } => cli::topics::topics(&config, prefix.as_deref()).await?,
        Command::Search {
            topic,
            actor,
            query,
        } => cli::search::search(&config, &topic, &query, &actor).await?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
