mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use memchat::config::MemchatConfig;
use memchat::models::ModelId;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memchat", version, about = "Chat assistant with long-term memory")]
struct Cli {
    /// Config file to load instead of ~/.memchat/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {
        /// User whose memories are read and written
        #[arg(long)]
        user: Option<String>,
        /// Model from the supported catalog
        #[arg(long)]
        model: Option<ModelId>,
    },
    /// List the supported models
    Models,
    /// Print every stored memory of a user
    Memories {
        #[arg(long)]
        user: Option<String>,
        /// Stop after this many memories (defaults to memory.audit_max_memories)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search a user's memories
    Search {
        query: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MemchatConfig::load_from(path)?,
        None => MemchatConfig::load()?,
    };

    // Log to stderr so the chat transcript on stdout stays clean.
    let filter = EnvFilter::try_new(&config.logging.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Chat { user, model } => {
            cli::chat::chat(&config, user, model).await?;
        }
        Command::Models => cli::models::models(&config),
        Command::Memories { user, limit } => {
            cli::memories::memories(&config, user.as_deref(), limit).await?;
        }
        Command::Search { query, user, limit } => {
            cli::search::search(&config, &query, user.as_deref(), limit).await?;
        }
    }

    Ok(())
}
