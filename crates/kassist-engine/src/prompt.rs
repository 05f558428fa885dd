//! Outbound request construction.
//!
//! The agent has no memory of its own between calls, so every request carries
//! the whole conversation flattened into one block of text.

use crate::message::Message;
use serde::{Deserialize, Serialize};

/// Body of a single agent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Flattened history followed by the new user turn.
    pub message: String,
    /// Agent selected by the current mode.
    pub agent_id: String,
    /// Session id, unchanged for the lifetime of the session.
    pub session_id: String,
    /// Fixed user identifier.
    pub user_id: String,
}

/// Flatten a transcript into `"<Role>: <content>"` lines.
pub fn format_history(transcript: &[Message]) -> String {
    transcript
        .iter()
        .map(|msg| format!("{}: {}", msg.role().label(), msg.content()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the `message` field for a new user utterance.
///
/// With an empty transcript the prompt is just the utterance.
pub fn build_prompt(transcript: &[Message], utterance: &str) -> String {
    if transcript.is_empty() {
        return utterance.to_string();
    }
    format!("{}\nUser: {utterance}", format_history(transcript))
}

impl AgentRequest {
    /// Assemble a request from the prior transcript and the new utterance.
    pub fn build(
        transcript: &[Message],
        utterance: &str,
        agent_id: impl Into<String>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            message: build_prompt(transcript, utterance),
            agent_id: agent_id.into(),
            session_id: session_id.into(),
            user_id: user_id.into(),
        }
    }
}
