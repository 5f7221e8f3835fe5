//! CLI entry point for lexchat

mod chat;
mod draft;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use lexchat_agent::{ConversationManager, QueryOutcome};
use lexchat_core::config::validate::validate_config;
use lexchat_core::config::{Config, ConfigLoader};
use lexchat_core::logging::init_logging;
use lexchat_remote::{ChatService, HttpChatService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::draft::DomicileArgs;

#[derive(Parser)]
#[command(name = "lexchat")]
#[command(about = "Terminal client for the legal assistant chat service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,

    /// Chat service URL, overriding the configured one
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Start an interactive chat
    Chat {
        /// Resume a stored session instead of starting a new one
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Ask a single question and print the answer
    Ask {
        /// Question to send
        #[arg(short, long)]
        message: String,
        /// Session to ask in; a new session is started when omitted
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Print the stored history of a session
    History {
        /// Session identifier
        session_id: String,
    },
    /// Request a generated legal document
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
}

#[derive(Subcommand)]
enum DraftCommands {
    /// Domicile certificate
    Domicile(DomicileArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    match cli.command {
        Commands::Init { force } => run_init(&config_loader, force)?,
        Commands::Chat { session } => {
            let config = load_config(&config_loader, cli.api_url)?;
            let _log_guard = init_logging(&config.logging)?;
            info!("Starting interactive chat");
            chat::run_chat(&config, session).await?;
        }
        Commands::Ask { message, session } => {
            let config = load_config(&config_loader, cli.api_url)?;
            let _log_guard = init_logging(&config.logging)?;
            info!("Running one-shot query");
            run_ask(&config, &message, session).await?;
        }
        Commands::History { session_id } => {
            let config = load_config(&config_loader, cli.api_url)?;
            let _log_guard = init_logging(&config.logging)?;
            info!("Fetching history for {}", session_id);
            run_history(&config, &session_id).await?;
        }
        Commands::Draft { command } => {
            let config = load_config(&config_loader, cli.api_url)?;
            let _log_guard = init_logging(&config.logging)?;
            match command {
                DraftCommands::Domicile(args) => {
                    info!("Requesting domicile certificate");
                    draft::run_domicile(&config, args).await?;
                }
            }
        }
    }

    Ok(())
}

/// Load the configuration and apply `--api-url`, validating the result
fn load_config(loader: &ConfigLoader, api_url: Option<String>) -> Result<Config> {
    let mut config = loader.load()?;
    if let Some(url) = api_url {
        config.service.base_url = url;
        validate_config(&config)?;
    }
    Ok(config)
}

fn run_init(loader: &ConfigLoader, force: bool) -> Result<()> {
    let path = loader.config_dir().join("config.json");
    if path.exists() && !force {
        println!(
            "{} already exists, use --force to overwrite",
            style(path.display()).yellow()
        );
        return Ok(());
    }

    loader.save(&Config::default())?;
    println!("Wrote default configuration to {}", style(path.display()).green());
    Ok(())
}

pub(crate) fn chat_service(config: &Config) -> Result<Arc<HttpChatService>> {
    Ok(Arc::new(HttpChatService::from_config(&config.service)?))
}

/// Make a session active: resume `session` when given, otherwise start fresh
pub(crate) async fn open_session(
    manager: &mut ConversationManager,
    session: Option<String>,
) -> Result<String> {
    let session_id = match session {
        Some(id) => {
            manager.load_session(&id).await?;
            id
        }
        None => manager.start_new_session().await?.to_string(),
    };
    Ok(session_id)
}

async fn run_ask(config: &Config, message: &str, session: Option<String>) -> Result<()> {
    let mut manager = ConversationManager::new(chat_service(config)?);
    let session_id = open_session(&mut manager, session).await?;

    let spinner = render::thinking_spinner();
    let outcome = manager.submit_query(message).await;
    spinner.finish_and_clear();

    match outcome? {
        QueryOutcome::Skipped => {
            warn!("Empty message, nothing sent");
            println!("Nothing to ask: the message is empty");
        }
        QueryOutcome::Answered { reply } => {
            println!("{}", reply);
            eprintln!("{} {}", style("session:").dim(), session_id);
        }
    }

    manager.flush_persistence().await;
    Ok(())
}

async fn run_history(config: &Config, session_id: &str) -> Result<()> {
    let service = chat_service(config)?;
    let messages = service.chat_history(session_id).await?;

    if messages.is_empty() {
        println!("Session {} has no messages", style(session_id).bold());
        return Ok(());
    }
    for message in &messages {
        render::print_message(message);
    }
    Ok(())
}
