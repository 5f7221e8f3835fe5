//! Catalog of sessions visited during this client lifetime

use super::store::Message;
use chrono::{DateTime, Utc};

/// Last-known snapshot of one session
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Session identifier
    pub session_id: String,
    /// Message log at the time of the last update
    pub messages: Vec<Message>,
    /// When the entry was last replaced
    pub updated_at: DateTime<Utc>,
}

/// Sessions ordered most-recently-updated first, one entry per id
#[derive(Debug, Clone, Default)]
pub struct SessionCatalog {
    entries: Vec<CatalogEntry>,
}

impl SessionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `session_id` (if any) and move it to the front
    pub fn upsert(&mut self, session_id: impl Into<String>, messages: Vec<Message>) -> &CatalogEntry {
        let session_id = session_id.into();
        self.entries.retain(|entry| entry.session_id != session_id);
        self.entries.insert(
            0,
            CatalogEntry {
                session_id,
                messages,
                updated_at: Utc::now(),
            },
        );
        &self.entries[0]
    }

    /// Get an entry by session id
    pub fn get(&self, session_id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.session_id == session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.get(session_id).is_some()
    }

    /// Entries, most recently updated first
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
