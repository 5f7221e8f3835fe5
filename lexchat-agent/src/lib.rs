//! Conversation session management for lexchat
//!
//! This crate owns the active chat session, its message log and the catalog
//! of visited sessions, and keeps them in sync with the remote chat service.

pub mod conversation;
pub mod events;
mod persistence;

pub use conversation::{
    ConversationError, ConversationManager, ConversationResult, QueryOutcome,
    SharedConversationManager,
};
pub use events::ConversationEvent;
