//! `nimbus doctor` — Diagnose configuration and connectivity.

use nimbus_config::Settings;
use nimbus_core::completion::CompletionService;
use nimbus_providers::openai_compat::OpenAiCompatCompletion;
use std::time::Duration;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Nimbus Doctor — Diagnostics");
    println!("===========================\n");

    let mut issues = 0;

    // Check config
    let config_path = Settings::config_path();
    if config_path.exists() {
        println!("  [ok] Config file found at {}", config_path.display());
    } else {
        println!(
            "  [..] No config file at {} — defaults apply",
            config_path.display()
        );
    }

    let settings = match Settings::load() {
        Ok(s) => {
            println!("  [ok] Configuration valid");
            s
        }
        Err(e) => {
            println!("  [!!] Configuration invalid: {e}");
            issues += 1;
            println!();
            println!("  {issues} issue(s) found.");
            return Ok(());
        }
    };

    // Check credentials
    if settings.completion.api_key.is_some() {
        println!("  [ok] Completion API key configured");
    } else {
        println!("  [!!] No completion API key — set OPENAI_API_KEY");
        issues += 1;
    }
    if settings.weather.api_key.is_some() {
        println!("  [ok] Weather API key configured");
    } else {
        println!("  [!!] No weather API key — set OPENWEATHER_API_KEY");
        issues += 1;
    }

    // Check completion connectivity
    if let Some(key) = &settings.completion.api_key {
        let provider = OpenAiCompatCompletion::new(
            "openai",
            &settings.completion.base_url,
            key.clone(),
            Duration::from_secs(settings.agent.http_timeout_secs),
        )?;
        match provider.health_check().await {
            Ok(true) => println!("  [ok] Completion service reachable"),
            Ok(false) => {
                println!("  [!!] Completion service rejected the request");
                issues += 1;
            }
            Err(e) => {
                println!("  [!!] Completion service unreachable: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
