//! Conversation session manager
//!
//! Holds exactly one active session plus the catalog of sessions visited in
//! this client lifetime. Local state changes only after the remote call that
//! triggers it succeeds; the one exception is persistence of the log after a
//! query, which runs in the background and never rolls back the local view.
//!
//! Operations take `&mut self`, so a manager runs one operation at a time.
//! Share it behind [`SharedConversationManager`] to queue concurrent callers.

use lexchat_core::session::{Message, Session, SessionCatalog};
use lexchat_remote::{ChatService, RemoteError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::events::ConversationEvent;
use crate::persistence::PersistenceQueue;

/// Errors returned by conversation operations
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A query was submitted before any session was started or loaded
    #[error("no active session; start a new chat first")]
    NoActiveSession,

    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),
}

pub type ConversationResult<T> = Result<T, ConversationError>;

/// Result of [`ConversationManager::submit_query`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The query was blank; nothing was sent or recorded
    Skipped,
    /// The query and its reply were appended to the active log
    Answered { reply: String },
}

/// A manager shared between tasks; the mutex queues concurrent operations
pub type SharedConversationManager = Arc<Mutex<ConversationManager>>;

pub struct ConversationManager {
    service: Arc<dyn ChatService>,
    active: Option<Session>,
    catalog: SessionCatalog,
    persistence: PersistenceQueue,
    events: Option<mpsc::UnboundedSender<ConversationEvent>>,
}

impl ConversationManager {
    /// Create a manager with no active session.
    ///
    /// Must be called inside a tokio runtime: the persistence worker is
    /// spawned here.
    pub fn new(service: Arc<dyn ChatService>) -> Self {
        Self::build(service, None)
    }

    /// Like [`ConversationManager::new`], publishing events to `events`
    pub fn with_events(
        service: Arc<dyn ChatService>,
        events: mpsc::UnboundedSender<ConversationEvent>,
    ) -> Self {
        Self::build(service, Some(events))
    }

    fn build(
        service: Arc<dyn ChatService>,
        events: Option<mpsc::UnboundedSender<ConversationEvent>>,
    ) -> Self {
        let persistence = PersistenceQueue::spawn(service.clone(), events.clone());
        Self {
            service,
            active: None,
            catalog: SessionCatalog::new(),
            persistence,
            events,
        }
    }

    pub fn into_shared(self) -> SharedConversationManager {
        Arc::new(Mutex::new(self))
    }

    /// Identifier of the active session, `None` before initialization
    pub fn active_session_id(&self) -> Option<&str> {
        self.active.as_ref().map(Session::id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Messages of the active session, oldest first
    pub fn messages(&self) -> &[Message] {
        self.active.as_ref().map(Session::messages).unwrap_or(&[])
    }

    /// Sessions visited so far, most recently updated first
    pub fn catalog(&self) -> &SessionCatalog {
        &self.catalog
    }

    /// Start a fresh session and make it active with an empty log.
    ///
    /// On failure the previously active session stays active.
    pub async fn start_new_session(&mut self) -> ConversationResult<&str> {
        let session_id = self.service.new_chat().await.map_err(|e| {
            warn!("Error starting new chat: {}", e);
            e
        })?;

        if session_id.trim().is_empty() {
            return Err(RemoteError::InvalidResponse(
                "service returned an empty session_id".to_string(),
            )
            .into());
        }

        info!("Started new chat session {}", session_id);
        self.emit(ConversationEvent::SessionStarted {
            session_id: session_id.clone(),
        });

        let session = self.active.insert(Session::new(session_id));
        Ok(session.id())
    }

    /// Send `text` in the active session and record the exchange.
    ///
    /// Blank input is skipped without contacting the service. If the reply
    /// cannot be fetched nothing is recorded. On success the updated log is
    /// queued for saving and the catalog entry for the session is replaced
    /// and moved to the front; save failures surface only as
    /// [`ConversationEvent::PersistFailed`].
    pub async fn submit_query(&mut self, text: &str) -> ConversationResult<QueryOutcome> {
        if text.trim().is_empty() {
            debug!("Ignoring blank query");
            return Ok(QueryOutcome::Skipped);
        }

        let session_id = self
            .active_session_id()
            .ok_or(ConversationError::NoActiveSession)?
            .to_string();

        let reply = self
            .service
            .process_query(text, &session_id)
            .await
            .map_err(|e| {
                warn!("Error generating response for session {}: {}", session_id, e);
                e
            })?;

        let session = self
            .active
            .as_mut()
            .ok_or(ConversationError::NoActiveSession)?;
        session.append_exchange(text, reply.clone());
        let snapshot = session.snapshot();

        self.persistence.enqueue(session_id.clone(), snapshot.clone());
        self.catalog.upsert(session_id, snapshot);

        Ok(QueryOutcome::Answered { reply })
    }

    /// Replace the active session with the stored log of `session_id`.
    ///
    /// On failure (unknown id, unreachable service) nothing changes.
    pub async fn load_session(&mut self, session_id: &str) -> ConversationResult<&[Message]> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ConversationError::InvalidSessionId(session_id.to_string()));
        }

        let messages = self.service.chat_history(session_id).await.map_err(|e| {
            warn!("Error loading chat history for {}: {}", session_id, e);
            e
        })?;

        info!(
            "Loaded session {} with {} messages",
            session_id,
            messages.len()
        );
        self.emit(ConversationEvent::SessionLoaded {
            session_id: session_id.to_string(),
            message_count: messages.len(),
        });

        let session = self.active.insert(Session::with_messages(session_id, messages));
        Ok(session.messages())
    }

    /// Wait for every save queued so far to finish
    pub async fn flush_persistence(&self) {
        self.persistence.flush().await;
    }

    fn emit(&self, event: ConversationEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}
