//! Interactive chat loop

use anyhow::Result;
use console::style;
use dialoguer::Input;
use lexchat_agent::{ConversationEvent, ConversationManager, QueryOutcome};
use lexchat_core::config::Config;
use lexchat_core::session::Message;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::render;

/// A line typed at the chat prompt
#[derive(Debug, PartialEq, Eq)]
enum ChatCommand {
    Query(String),
    New,
    Load(String),
    Sessions,
    History,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> ChatCommand {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ChatCommand::Query(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match (name, arg) {
        ("new", _) => ChatCommand::New,
        ("load", id) if !id.is_empty() => ChatCommand::Load(id.to_string()),
        ("sessions", _) => ChatCommand::Sessions,
        ("history", _) => ChatCommand::History,
        ("help", _) => ChatCommand::Help,
        ("quit" | "exit", _) => ChatCommand::Quit,
        _ => ChatCommand::Unknown(trimmed.to_string()),
    }
}

fn print_help() {
    println!("{}", style("Commands:").bold());
    println!("  /new          start a new chat");
    println!("  /load <id>    open a previous chat");
    println!("  /sessions     list chats from this run");
    println!("  /history      show the current chat again");
    println!("  /quit         leave");
}

/// Blocking prompt run off the async runtime. `initial` pre-fills the line,
/// used to hand back a query whose answer could not be fetched.
async fn prompt(initial: Option<String>) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        let mut input = Input::<String>::new().with_prompt("You").allow_empty(true);
        if let Some(text) = initial {
            input = input.with_initial_text(text);
        }
        input.interact_text()
    })
    .await??;
    Ok(line)
}

fn report_events(rx: &mut mpsc::UnboundedReceiver<ConversationEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            ConversationEvent::PersistFailed { session_id, error } => {
                println!(
                    "{}",
                    style(format!("(chat {} not saved: {})", session_id, error)).dim()
                );
            }
            other => debug!("Conversation event: {:?}", other),
        }
    }
}

pub async fn run_chat(config: &Config, session: Option<String>) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut manager = ConversationManager::with_events(crate::chat_service(config)?, event_tx);

    println!("{}", style("Legal Assistant").bold().underlined());
    match crate::open_session(&mut manager, session).await {
        Ok(id) => {
            println!("Session {}", style(id).bold());
            for message in manager.messages() {
                render::print_message(message);
            }
        }
        Err(e) => {
            error!("Could not open a session: {}", e);
            println!("{} {}", style("Could not open a session:").red(), e);
            println!("Use /new to retry");
        }
    }
    print_help();

    converse(&mut manager, &mut event_rx, prompt).await
}

/// Read lines with `read_line` and act on them until `/quit` or a failed read.
/// Queued saves are flushed on every way out.
async fn converse<F, Fut>(
    manager: &mut ConversationManager,
    event_rx: &mut mpsc::UnboundedReceiver<ConversationEvent>,
    mut read_line: F,
) -> Result<()>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut pending: Option<String> = None;
    let mut prompt_error = None;
    loop {
        report_events(event_rx);
        let line = match read_line(pending.take()).await {
            Ok(line) => line,
            Err(e) => {
                error!("Prompt failed: {}", e);
                prompt_error = Some(e);
                break;
            }
        };

        match parse_command(&line) {
            ChatCommand::Query(text) => {
                let spinner = render::thinking_spinner();
                let outcome = manager.submit_query(&text).await;
                spinner.finish_and_clear();

                match outcome {
                    Ok(QueryOutcome::Answered { reply }) => {
                        render::print_message(&Message::agent(reply));
                    }
                    Ok(QueryOutcome::Skipped) => {}
                    Err(e) => {
                        println!("{} {}", style("Error generating response:").red(), e);
                        pending = Some(text);
                    }
                }
            }
            ChatCommand::New => match manager.start_new_session().await {
                Ok(id) => println!("Started session {}", style(id).bold()),
                Err(e) => println!("{} {}", style("Error starting new chat:").red(), e),
            },
            ChatCommand::Load(id) => match manager.load_session(&id).await {
                Ok(messages) => {
                    println!("Loaded session {}", style(&id).bold());
                    for message in messages {
                        render::print_message(message);
                    }
                }
                Err(e) => println!("{} {}", style("Error loading chat history:").red(), e),
            },
            ChatCommand::Sessions => {
                render::print_catalog(manager.catalog(), manager.active_session_id());
            }
            ChatCommand::History => {
                for message in manager.messages() {
                    render::print_message(message);
                }
            }
            ChatCommand::Help => print_help(),
            ChatCommand::Quit => break,
            ChatCommand::Unknown(command) => {
                println!("Unknown command {}, try /help", style(command).yellow());
            }
        }
    }

    manager.flush_persistence().await;
    report_events(event_rx);
    prompt_error.map_or(Ok(()), Err)
}
