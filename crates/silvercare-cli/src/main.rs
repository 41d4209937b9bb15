use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use silvercare_application::AppContext;
use silvercare_core::config::AppConfig;
use silvercare_infrastructure::ConfigService;

mod commands;

#[derive(Parser)]
#[command(name = "silvercare")]
#[command(about = "SilverCare - elder-care companion", long_about = None)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answer chat turns in-process instead of calling the chat endpoint
    #[arg(long, global = true)]
    direct: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the companion. Without a message, starts an interactive session
    Chat { message: Option<String> },
    /// Show the conversation history
    History {
        /// Delete the history instead
        #[arg(long)]
        clear: bool,
    },
    /// Show simulated health metrics
    Vitals {
        /// Keep running and print this many further ticks
        #[arg(long, value_name = "TICKS")]
        watch: Option<usize>,
    },
    /// Manage the notification feed
    Alerts {
        #[command(subcommand)]
        action: Option<AlertsAction>,
    },
    /// Run a quick-action scenario
    Quick {
        #[command(subcommand)]
        action: QuickAction,
    },
    /// Serve the chat proxy on /api/chat
    Serve {
        /// Address to bind (defaults to [proxy] bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum AlertsAction {
    /// List alerts, newest first
    List,
    /// Mark an alert read
    Read { id: String },
    /// Remove an alert
    Dismiss { id: String },
    /// Remove every alert
    Clear,
}

#[derive(Subcommand)]
pub enum QuickAction {
    /// Raise an emergency alert
    Emergency {
        /// Contact 119, family and the care team without asking
        #[arg(long)]
        yes: bool,
    },
    /// Call a family member
    Family {
        /// Contact number; asked interactively when omitted
        choice: Option<String>,
    },
    /// Check today's medication schedule
    Medication {
        /// Take the next pending dose now
        #[arg(long)]
        take: bool,
    },
    /// Play the weekly health report
    Report,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::utils::init_tracing(cli.verbose);

    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::default_location().context("Failed to locate config file")?,
    };

    if let Commands::Config { action } = &cli.command {
        return commands::config::run(&config_service, action);
    }

    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if cli.direct {
        config.chat.direct = true;
    }
    tracing::debug!(
        "Loaded config from {} (direct: {})",
        config_service.path().display(),
        config.chat.direct
    );

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(&config, bind).await,
        command => {
            let context = build_context(config)?;
            let result = run_with_context(&context, command).await;
            context.shutdown();
            result
        }
    }
}

fn build_context(config: AppConfig) -> Result<AppContext> {
    AppContext::from_config(config).context("Failed to initialise SilverCare")
}

async fn run_with_context(context: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Chat { message } => commands::chat::run(context, message).await,
        Commands::History { clear } => commands::history::run(context, clear),
        Commands::Vitals { watch } => commands::vitals::run(context, watch).await,
        Commands::Alerts { action } => {
            commands::alerts::run(context, action.unwrap_or(AlertsAction::List))
        }
        Commands::Quick { action } => commands::quick::run(context, action).await,
        Commands::Serve { .. } | Commands::Config { .. } => Ok(()),
    }
}
