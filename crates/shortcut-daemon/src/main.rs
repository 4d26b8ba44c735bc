//! Smart Shortcuts service CLI.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use shortcut_catalog::ShortcutDraft;
use shortcut_config_and_utils::{init_logging, Config, Paths};
use shortcut_daemon::{handle_message, AppState, CommandDispatcher, StdoutNavigator};

/// Smart Shortcuts command-line interface.
#[derive(Parser)]
#[command(name = "shortcut-daemon")]
#[command(about = "Smart Shortcuts background service: commands, messages, shortcuts and licensing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Base directory for stores, config and logs. Defaults to ~/.smart-shortcuts
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a keyboard command (e.g. shortcut-01, open-custom-url)
    Command { name: String },
    /// Handle one extension message given as JSON
    Message { json: String },
    /// Run the URL safety gate
    CheckUrl { url: String },
    /// Sanitize a URL for navigation
    Sanitize { url: String },
    /// Manage shortcuts
    Shortcuts {
        #[command(subcommand)]
        command: ShortcutCommands,
    },
    /// Manage the license
    License {
        #[command(subcommand)]
        command: LicenseCommands,
    },
    /// Manage the on-page panel settings
    Panel {
        #[command(subcommand)]
        command: PanelCommands,
    },
}

#[derive(Subcommand)]
enum ShortcutCommands {
    /// List shortcuts, optionally those shown on a host
    List {
        #[arg(long)]
        host: Option<String>,
    },
    /// Add a shortcut
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        /// Keyboard command; defaults to the next free one
        #[arg(long)]
        command: Option<String>,
    },
    /// Replace the shortcut at an index
    Update {
        index: usize,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        command: Option<String>,
    },
    /// Remove the shortcut at an index
    Remove { index: usize },
}

#[derive(Subcommand)]
enum LicenseCommands {
    /// Activate a license key on this instance
    Activate { key: String },
    /// Re-validate the license (defaults to the stored key)
    Refresh { key: Option<String> },
    /// Deactivate the license (defaults to the stored key)
    Deactivate { key: Option<String> },
    /// Show the stored license status
    Info,
}

#[derive(Subcommand)]
enum PanelCommands {
    /// Hide the panel on a domain
    Hide { domain: String },
    /// Show the panel on a domain again
    Unhide { domain: String },
    /// Print panel preferences and hidden domains
    Show,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    init_logging(&cli.log_level, &paths);

    let config = Config::load(&paths)?;
    let state = AppState::build(config, &paths, Arc::new(StdoutNavigator))?;

    match cli.command {
        Commands::Command { name } => {
            let dispatcher = CommandDispatcher::new(state);
            print_json(&dispatcher.handle_command(&name).await)?;
        }
        Commands::Message { json } => {
            let message: serde_json::Value =
                serde_json::from_str(&json).unwrap_or(serde_json::Value::Null);
            print_json(&handle_message(&state, &message).await)?;
        }
        Commands::CheckUrl { url } => {
            let verdict = state.gate.check(&url);
            print_json(&serde_json::json!({
                "url": url,
                "safe": verdict.is_safe(),
                "reason": verdict.reason(),
            }))?;
        }
        Commands::Sanitize { url } => {
            println!("{}", state.sanitizer.sanitize(&url));
        }
        Commands::Shortcuts { command } => run_shortcuts(&state, command).await?,
        Commands::License { command } => run_license(&state, command).await?,
        Commands::Panel { command } => run_panel(&state, command)?,
    }

    Ok(())
}

async fn run_shortcuts(
    state: &AppState,
    command: ShortcutCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ShortcutCommands::List { host: None } => print_json(&state.catalog.list()?)?,
        ShortcutCommands::List { host: Some(host) } => {
            if state.panel.is_hidden_on(&host)? {
                print_json(&Vec::<()>::new())?;
            } else {
                print_json(&state.catalog.visible_on(&host)?)?;
            }
        }
        ShortcutCommands::Add {
            title,
            url,
            command,
        } => {
            let command = match command {
                Some(command) => Some(command),
                None => state
                    .catalog
                    .next_available_command_id()?
                    .map(str::to_string),
            };
            let draft = ShortcutDraft {
                title,
                url,
                command,
            };
            let quota = state.quota().await?;
            print_json(&state.catalog.add(&draft, quota)?)?;
        }
        ShortcutCommands::Update {
            index,
            title,
            url,
            command,
        } => {
            let draft = ShortcutDraft {
                title,
                url,
                command,
            };
            let quota = state.quota().await?;
            print_json(&state.catalog.update(index, &draft, quota)?)?;
        }
        ShortcutCommands::Remove { index } => print_json(&state.catalog.delete(index)?)?,
    }
    Ok(())
}

async fn run_license(
    state: &AppState,
    command: LicenseCommands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        LicenseCommands::Activate { key } => print_json(&state.license.activate(key).await?)?,
        LicenseCommands::Refresh { key } => print_json(&state.license.refresh(key).await?)?,
        LicenseCommands::Deactivate { key } => {
            print_json(&state.license.deactivate(key).await?)?
        }
        LicenseCommands::Info => print_json(&state.license.info().await?)?,
    }
    Ok(())
}

fn run_panel(state: &AppState, command: PanelCommands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        PanelCommands::Hide { domain } => {
            state.panel.set_hidden(&domain, true)?;
        }
        PanelCommands::Unhide { domain } => {
            state.panel.set_hidden(&domain, false)?;
        }
        PanelCommands::Show => {}
    }
    print_json(&serde_json::json!({
        "preferences": state.panel.preferences()?,
        "hiddenDomains": state.panel.blacklist()?,
    }))
}
