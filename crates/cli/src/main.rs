//! Nimbus CLI — the main entry point.
//!
//! Commands:
//! - `ask`    — Answer a single weather question
//! - `chat`   — Interactive question loop
//! - `doctor` — Diagnose configuration and connectivity

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "nimbus",
    about = "Nimbus — natural-language weather agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single weather question
    Ask {
        /// The question, e.g. "What's the weather in Paris?"
        query: String,

        /// Reasoning strategy: react, cot, or tot
        #[arg(short, long, default_value = "react")]
        strategy: String,

        /// Print the full result (location, warnings) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive question loop
    Chat {
        /// Default reasoning strategy for lines without a prefix
        #[arg(short, long, default_value = "react")]
        strategy: String,
    },

    /// Diagnose configuration and connectivity
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask {
            query,
            strategy,
            json,
        } => commands::ask::run(&query, &strategy, json).await?,
        Commands::Chat { strategy } => commands::chat::run(&strategy).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
