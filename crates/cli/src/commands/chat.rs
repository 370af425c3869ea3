//! `nimbus chat` — Interactive question loop.
//!
//! Each line is one query. A line may pick its own strategy with a
//! `react:`, `cot:`, or `tot:` prefix; otherwise the session default
//! applies. `exit` or `quit` ends the session.

use nimbus_agent::WeatherAgent;
use nimbus_config::Settings;
use nimbus_core::model::Strategy;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

pub async fn run(default_strategy: &str) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !settings.has_credentials() {
        super::ask::print_credentials_help();
        return Err("Missing API credentials. See above for setup instructions.".into());
    }

    let default_strategy: Strategy = default_strategy.parse()?;
    let agent = WeatherAgent::from_settings(&settings)?;
    info!(%default_strategy, "starting chat session");

    println!();
    println!("  Nimbus — ask me about the weather anywhere.");
    println!();
    println!("  Default strategy: {default_strategy}");
    println!("  Prefix a line with react:, cot:, or tot: to switch for one query.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let (strategy, query) = split_strategy_prefix(line, default_strategy);

        eprint!("  ...");
        let result = agent.run_query(query, strategy).await;
        eprint!("\r     \r");

        println!();
        for answer_line in result.answer_text.lines() {
            println!("  Nimbus > {answer_line}");
        }
        for warning in &result.warnings {
            eprintln!("  [warning] {warning}");
        }
        println!();

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

/// Split an optional `react:` / `cot:` / `tot:` prefix off a chat line.
fn split_strategy_prefix(line: &str, default: Strategy) -> (Strategy, &str) {
    if let Some((prefix, rest)) = line.split_once(':') {
        if let Ok(strategy) = prefix.trim().parse::<Strategy>() {
            return (strategy, rest.trim());
        }
    }
    (default, line)
}
