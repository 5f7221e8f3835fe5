//! Terminal output helpers

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use lexchat_core::session::{Message, Sender, SessionCatalog};
use std::time::Duration;

pub fn print_message(message: &Message) {
    let label = match message.sender {
        Sender::Human => style("You").cyan().bold(),
        Sender::Agent => style("Assistant").green().bold(),
    };
    println!("{}: {}", label, message.content);
}

pub fn print_catalog(catalog: &SessionCatalog, active: Option<&str>) {
    if catalog.is_empty() {
        println!("{}", style("No previous chats yet").dim());
        return;
    }

    for entry in catalog.iter() {
        let marker = if Some(entry.session_id.as_str()) == active {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}  {} messages, updated {}",
            marker,
            style(&entry.session_id).bold(),
            entry.messages.len(),
            entry
                .updated_at
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
        );
    }
}

/// Spinner shown while waiting on the chat service
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
