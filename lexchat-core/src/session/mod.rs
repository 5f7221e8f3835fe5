//! Conversation data model
//!
//! A session is a server-issued identifier plus its ordered, append-only
//! message log. The catalog keeps the last-known snapshot of every session
//! visited during the current client lifetime.

pub mod catalog;
pub mod store;

pub use catalog::{CatalogEntry, SessionCatalog};
pub use store::{Message, Sender, Session};
