//! CLI command implementations.
//!
//! - `open`: launch the TUI at a route
//! - `config`: show, get, and set configuration values

use owo_colors::OwoColorize;

use iocraft::prelude::*;

use crate::config::Config;
use crate::error::{BugboardError, Result};
use crate::tui::{App, Route};

/// Launch the TUI at the given route.
pub fn cmd_open(route: Route) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BugboardError::Other(format!("Failed to create runtime: {e}")))?;

    rt.block_on(async {
        element!(App(initial_route: route))
            .fullscreen()
            .await
            .map_err(|e| BugboardError::Other(format!("TUI error: {e}")))
    })
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

/// Show current configuration
pub fn cmd_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".cyan().bold());
    println!();
    println!("{}: {}", "api.url".cyan(), config.api_url());

    let token_status = if config.api_token.is_some() {
        "configured".green().to_string()
    } else {
        "built-in default".dimmed().to_string()
    };
    println!("{}: {}", "api.token".cyan(), token_status);
    println!("{}: {}s", "remote.timeout".cyan(), config.remote_timeout);
    println!();
    println!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    );
    Ok(())
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str) -> Result<()> {
    let config = Config::load()?;

    match key {
        "api.url" => println!("{}", config.api_url()),
        "api.token" => {
            let masked = mask_sensitive_value(&config.api_token());
            println!("{masked} (masked - showing first 2 and last 2 characters)");
        }
        "remote.timeout" => println!("{}", config.remote_timeout),
        _ => {
            return Err(BugboardError::Config(format!(
                "unknown config key '{key}'. Valid keys: api.url, api.token, remote.timeout"
            )));
        }
    }
    Ok(())
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "api.url" => {
            url::Url::parse(value)
                .map_err(|e| BugboardError::Config(format!("invalid URL '{value}': {e}")))?;
            config.set_api_url(value.to_string());
        }
        "api.token" => {
            config.set_api_token(value.to_string());
        }
        "remote.timeout" => {
            let seconds: u64 = value.parse().map_err(|_| {
                BugboardError::Config(format!(
                    "invalid value '{value}' for remote.timeout. Expected a number of seconds"
                ))
            })?;
            config.set_remote_timeout(seconds);
        }
        _ => {
            return Err(BugboardError::Config(format!(
                "unknown config key '{key}'. Valid keys: api.url, api.token, remote.timeout"
            )));
        }
    }
    config.save()?;
    println!("Set {}", key.cyan());
    Ok(())
}
