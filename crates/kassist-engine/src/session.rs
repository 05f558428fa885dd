//! Conversation session: id, mode and the ordered transcript.

use crate::message::{Message, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which logical agent the next turn is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// General conversation.
    #[default]
    Chat,
    /// History / summarization agent.
    History,
}

impl ChatMode {
    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ChatMode::Chat => ChatMode::History,
            ChatMode::History => ChatMode::Chat,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChatMode::Chat => "Chat",
            ChatMode::History => "History",
        }
    }
}

/// A single conversation session.
///
/// The transcript is append-only. Resetting a conversation replaces the whole
/// `Session` value rather than clearing fields one by one.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: String,
    /// Mode used to pick the agent id for the next turn.
    pub mode: ChatMode,
    transcript: Vec<Message>,
}

impl Session {
    /// Start a new session with a random id and an empty transcript.
    pub fn start() -> Self {
        Self {
            id: new_session_id(),
            mode: ChatMode::default(),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages in chronological order.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    /// Append a new message and return it.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &Message {
        self.transcript.push(Message::new(role, content));
        &self.transcript[self.transcript.len() - 1]
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::start()
    }
}

/// Random session id: the simple (hyphenless) form of a v4 UUID.
fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}
