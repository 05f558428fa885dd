//! Configuration types for the kassist engine.
//!
//! This module defines where requests go and which agent ids they carry.

use crate::session::ChatMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".kassist/config.json";

/// Main configuration for kassist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL the agent requests are POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Identifier sent as `user_id` on every request.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Agent identifiers per mode.
    #[serde(default)]
    pub agents: AgentIds,

    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// Prompts offered on the empty conversation screen.
    #[serde(default = "default_suggested_prompts")]
    pub suggested_prompts: Vec<String>,
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/agent".into()
}

fn default_user_id() -> String {
    "chat-user".into()
}

fn default_chat_agent() -> String {
    "6935f72d1f3e985c1e35fe6e".into()
}

fn default_suggested_prompts() -> Vec<String> {
    vec![
        "What can you help me with today?".into(),
        "Tell me about yourself".into(),
        "How can I get the most out of this chat?".into(),
        "What topics can we discuss?".into(),
    ]
}

/// Agent identifiers, one per [`ChatMode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIds {
    /// Agent used for general chat.
    #[serde(default = "default_chat_agent")]
    pub chat: String,

    /// Agent used in history mode. Without one, only chat mode is available.
    #[serde(default)]
    pub history: Option<String>,
}

impl Default for AgentIds {
    fn default() -> Self {
        Self {
            chat: default_chat_agent(),
            history: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Agent id for the given mode, if that mode is configured.
    pub fn agent_for(&self, mode: ChatMode) -> Option<&str> {
        match mode {
            ChatMode::Chat => Some(self.agents.chat.as_str()),
            ChatMode::History => self.agents.history.as_deref(),
        }
    }

    /// Whether the two-agent variant (mode toggle) is enabled.
    pub fn has_history_agent(&self) -> bool {
        self.agents.history.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_id: default_user_id(),
            agents: AgentIds::default(),
            request_timeout_seconds: None,
            suggested_prompts: default_suggested_prompts(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
