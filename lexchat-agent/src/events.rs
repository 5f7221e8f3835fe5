//! Events published by the conversation manager

use serde::{Deserialize, Serialize};

/// Notifications about session changes and background persistence.
///
/// Persistence outcomes are only reported here; they never fail the
/// operation that queued the write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A fresh session became active
    SessionStarted { session_id: String },
    /// A stored session became active
    SessionLoaded {
        session_id: String,
        message_count: usize,
    },
    /// The remote store accepted a session log
    Persisted {
        session_id: String,
        message_count: usize,
    },
    /// The remote store rejected a session log or was unreachable
    PersistFailed { session_id: String, error: String },
}
