//! Session data structures

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The person asking questions
    Human,
    /// The remote legal assistant
    Agent,
}

impl Sender {
    /// Wire representation used by the remote service
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Human => "Human",
            Sender::Agent => "AI",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "user" => Ok(Sender::Human),
            "ai" | "agent" | "assistant" => Ok(Sender::Agent),
            other => Err(format!("unknown message sender: {}", other)),
        }
    }
}

impl Serialize for Sender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A chat message
///
/// History payloads from the chat backend sometimes carry the author under
/// `type` (`"human"` / `"ai"`) instead of `sender`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message author
    #[serde(alias = "type")]
    pub sender: Sender,
    /// Message text
    pub content: String,
}

impl Message {
    /// Create a new chat message
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
        }
    }

    /// Create a message authored by the user
    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Sender::Human, content)
    }

    /// Create a message authored by the assistant
    pub fn agent(content: impl Into<String>) -> Self {
        Self::new(Sender::Agent, content)
    }
}

/// A conversation session
///
/// The log is append-only: callers only ever see it as a shared slice and
/// the single mutator appends a full question/answer exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    messages: Vec<Message>,
}

impl Session {
    /// Create an empty session
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
        }
    }

    /// Create a session from a previously persisted log
    pub fn with_messages(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
        }
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages in chronological order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a question and its answer, in that order
    pub fn append_exchange(&mut self, query: impl Into<String>, reply: impl Into<String>) {
        self.messages.push(Message::human(query));
        self.messages.push(Message::agent(reply));
    }

    /// Owned copy of the current log
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new("s1");
        assert_eq!(session.id(), "s1");
        assert!(session.is_empty());
    }

    #[test]
    fn test_append_exchange_keeps_order() {
        let mut session = Session::new("s1");
        session.append_exchange("What is tort law?", "A civil wrong.");
        session.append_exchange("Give an example", "Negligence.");

        let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
        assert_eq!(
            senders,
            vec![Sender::Human, Sender::Agent, Sender::Human, Sender::Agent]
        );
        assert_eq!(session.messages()[0].content, "What is tort law?");
        assert_eq!(session.messages()[3].content, "Negligence.");
    }

    #[test]
    fn test_sender_wire_format() {
        let json = serde_json::to_string(&Message::agent("hi")).unwrap();
        assert_eq!(json, r#"{"sender":"AI","content":"hi"}"#);

        let json = serde_json::to_string(&Message::human("hello")).unwrap();
        assert_eq!(json, r#"{"sender":"Human","content":"hello"}"#);
    }

    #[test]
    fn test_lenient_history_decoding() {
        let raw = r#"[
            {"content": "q", "type": "human", "additional_kwargs": {}, "id": null},
            {"content": "a", "type": "ai", "response_metadata": {}},
            {"sender": "user", "content": "q2"},
            {"sender": "Assistant", "content": "a2"}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            messages,
            vec![
                Message::human("q"),
                Message::agent("a"),
                Message::human("q2"),
                Message::agent("a2"),
            ]
        );
    }

    #[test]
    fn test_unknown_sender_rejected() {
        let err = serde_json::from_str::<Message>(r#"{"sender":"system","content":"x"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("unknown message sender"));
    }
}
