//! kassist-engine: Headless conversation engine for the kassist agent client
//!
//! This crate provides the core conversation logic, including:
//! - Session and transcript management
//! - Prompt construction from conversation history
//! - Normalization of loosely-structured agent replies
//! - HTTP transport to the agent endpoint
//! - Configuration loading

pub mod config;
pub mod conversation;
pub mod message;
pub mod prompt;
pub mod reply;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use config::{AgentIds, Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use conversation::{Conversation, TurnState};
pub use message::{Message, Role};
pub use prompt::{build_prompt, format_history, AgentRequest};
pub use reply::{
    normalize_reply, AgentReply, ReplyBody, StructuredBody, FALLBACK_REPLY, TRANSPORT_ERROR_REPLY,
};
pub use session::{ChatMode, Session};
pub use transport::{AgentTransport, HttpTransport, TransportError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
