//! Background persistence of session logs
//!
//! Saves are queued on one worker task, so writes reach the remote store in
//! the order they were submitted and an older snapshot of a session can
//! never land after a newer one.

use lexchat_core::session::Message;
use lexchat_remote::ChatService;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::events::ConversationEvent;

enum PersistCommand {
    Save {
        session_id: String,
        messages: Vec<Message>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the persistence worker. Dropping it lets the worker drain the
/// queue and exit.
pub(crate) struct PersistenceQueue {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl PersistenceQueue {
    /// Spawn the worker on the current tokio runtime
    pub(crate) fn spawn(
        service: Arc<dyn ChatService>,
        events: Option<mpsc::UnboundedSender<ConversationEvent>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(service, rx, events));
        Self { tx }
    }

    /// Queue a full session log for saving
    pub(crate) fn enqueue(&self, session_id: String, messages: Vec<Message>) {
        let command = PersistCommand::Save {
            session_id,
            messages,
        };
        if let Err(mpsc::error::SendError(PersistCommand::Save { session_id, .. })) =
            self.tx.send(command)
        {
            warn!("Persistence worker gone, dropping save for session {}", session_id);
        }
    }

    /// Wait until every save queued before this call has completed
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(PersistCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn run_worker(
    service: Arc<dyn ChatService>,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
    events: Option<mpsc::UnboundedSender<ConversationEvent>>,
) {
    debug!("Persistence worker started");

    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Save {
                session_id,
                messages,
            } => {
                let event = match service.save_chat(&session_id, &messages).await {
                    Ok(()) => {
                        debug!(
                            "Saved {} messages for session {}",
                            messages.len(),
                            session_id
                        );
                        ConversationEvent::Persisted {
                            session_id,
                            message_count: messages.len(),
                        }
                    }
                    Err(e) => {
                        warn!("Failed to save chat for session {}: {}", session_id, e);
                        ConversationEvent::PersistFailed {
                            session_id,
                            error: e.to_string(),
                        }
                    }
                };
                if let Some(events) = &events {
                    let _ = events.send(event);
                }
            }
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Persistence worker stopped");
}
