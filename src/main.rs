use clap::{Parser, Subcommand};
use std::process::ExitCode;

use bugboard::commands::{cmd_config_get, cmd_config_set, cmd_config_show, cmd_open};
use bugboard::tui::Route;

#[derive(Parser)]
#[command(name = "bugboard")]
#[command(about = "Terminal client for a bug-tracking REST service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI at a route (default)
    #[command(visible_alias = "o")]
    Open {
        /// Route to open: / for the table, /addBug or /editBug for the form
        #[arg(default_value = "/")]
        route: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Key: api.url, api.token, remote.timeout
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Key: api.url, api.token, remote.timeout
        key: String,

        /// New value
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Open {
        route: "/".to_string(),
    });

    let result = match command {
        Commands::Open { route } => cmd_open(Route::parse(&route)),

        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Get { key } => cmd_config_get(&key),
            ConfigAction::Set { key, value } => cmd_config_set(&key, &value),
        },
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
