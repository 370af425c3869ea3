//! `nimbus ask` — Answer a single weather question.

use nimbus_agent::WeatherAgent;
use nimbus_config::Settings;
use nimbus_core::model::Strategy;
use tracing::info;

pub async fn run(query: &str, strategy: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if !settings.has_credentials() {
        print_credentials_help();
        return Err("Missing API credentials. See above for setup instructions.".into());
    }

    let strategy: Strategy = strategy.parse()?;
    let agent = WeatherAgent::from_settings(&settings)?;

    info!(%strategy, "running one-shot query");
    eprint!("  Thinking...");
    let result = agent.run_query(query, strategy).await;
    eprint!("\r              \r");
    info!(location = %result.location_used, warnings = result.warnings.len(), "query answered");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.answer_text);
        for warning in &result.warnings {
            eprintln!("  [warning] {warning}");
        }
    }

    Ok(())
}

pub(crate) fn print_credentials_help() {
    eprintln!();
    eprintln!("  ERROR: API credentials missing!");
    eprintln!();
    eprintln!("  Nimbus needs two keys. Set them as environment variables:");
    eprintln!("    OPENAI_API_KEY      = 'sk-...'   (completion service)");
    eprintln!("    OPENWEATHER_API_KEY = '...'      (weather data)");
    eprintln!();
    eprintln!("  Or add them to your config file:");
    eprintln!("    {}", Settings::config_path().display());
    eprintln!();
}
