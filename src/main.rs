mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use daybook::category::Category;
use daybook::{config, server};

#[derive(Parser)]
#[command(name = "daybook", version, about = "Diary backend with automatic entry categorization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Categorize a piece of text
    Classify {
        text: String,
        /// Use keyword matching only, even if a classifier credential is configured
        #[arg(long)]
        offline: bool,
    },
    /// Search an owner's entries
    Search {
        owner: String,
        query: Option<String>,
        /// Only entries in this category (e.g. TODO)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show per-category entry counts for an owner
    Stats { owner: String },
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.trim().to_uppercase().parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::DaybookConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::serve(config).await?;
        }
        Command::Classify { text, offline } => {
            cli::classify(&config, &text, offline).await?;
        }
        Command::Search {
            owner,
            query,
            category,
            limit,
        } => {
            cli::search(&config, &owner, query.as_deref(), category, limit)?;
        }
        Command::Stats { owner } => {
            cli::stats(&config, &owner)?;
        }
    }

    Ok(())
}
