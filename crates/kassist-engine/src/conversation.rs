//! Conversation controller.
//!
//! Owns the [`Session`] and the request lifecycle. A turn is split into
//! [`Conversation::begin_turn`] (append the user message, build the request)
//! and [`Conversation::finish_turn`] (append the assistant reply) so that a UI
//! can run the request on a background task and keep redrawing meanwhile.
//! [`Conversation::send`] runs both halves inline.

use crate::config::Config;
use crate::message::{Message, Role};
use crate::prompt::AgentRequest;
use crate::reply::{AgentReply, TRANSPORT_ERROR_REPLY};
use crate::session::{ChatMode, Session};
use crate::transport::{AgentTransport, TransportError};
use serde_json::Value;

/// Request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready to accept a new message.
    #[default]
    Idle,
    /// A request is in flight; sends are refused.
    Sending,
}

/// The conversation controller.
#[derive(Debug)]
pub struct Conversation {
    config: Config,
    session: Session,
    state: TurnState,
    /// Session the in-flight request was issued for.
    pending_session: Option<String>,
}

impl Conversation {
    /// Create a controller with a freshly started session.
    pub fn new(config: Config) -> Self {
        let session = Session::start();
        tracing::info!(session_id = %session.id(), "session started");
        Self {
            config,
            session,
            state: TurnState::Idle,
            pending_session: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &[Message] {
        self.session.transcript()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.state == TurnState::Sending
    }

    pub fn mode(&self) -> ChatMode {
        self.session.mode
    }

    /// Whether the mode toggle is available (a history agent is configured).
    pub fn can_switch_mode(&self) -> bool {
        self.config.has_history_agent()
    }

    /// Discard the current session and start a new one in the default mode.
    ///
    /// An in-flight request keeps running; its reply is dropped when it arrives.
    pub fn start_session(&mut self) {
        self.session = Session::start();
        tracing::info!(session_id = %self.session.id(), "session started");
    }

    /// Select a mode. Returns `false` when the mode has no configured agent.
    pub fn set_mode(&mut self, mode: ChatMode) -> bool {
        if self.config.agent_for(mode).is_none() {
            return false;
        }
        self.session.mode = mode;
        true
    }

    /// Switch between chat and history mode. The transcript is kept.
    pub fn toggle_mode(&mut self) -> bool {
        self.set_mode(self.session.mode.toggled())
    }

    fn agent_id(&self) -> &str {
        self.config
            .agent_for(self.session.mode)
            .unwrap_or(&self.config.agents.chat)
    }

    /// Start a turn: record the user message and return the request to send.
    ///
    /// Returns `None` without touching the transcript when a request is already
    /// in flight or the text is blank.
    pub fn begin_turn(&mut self, text: &str) -> Option<AgentRequest> {
        if self.is_busy() {
            tracing::debug!("send ignored: request already in flight");
            return None;
        }
        if text.trim().is_empty() {
            return None;
        }

        let request = AgentRequest::build(
            self.session.transcript(),
            text,
            self.agent_id(),
            self.session.id(),
            self.config.user_id.as_str(),
        );
        self.session.append(Role::User, text);
        self.state = TurnState::Sending;
        self.pending_session = Some(self.session.id().to_string());
        Some(request)
    }

    /// Finish the in-flight turn with the transport outcome.
    ///
    /// Appends exactly one assistant message and returns it. Returns `None` when
    /// no turn was in flight, or when the session was replaced while waiting.
    pub fn finish_turn(&mut self, outcome: Result<Value, TransportError>) -> Option<&Message> {
        if !self.is_busy() {
            return None;
        }
        self.state = TurnState::Idle;
        let issued_for = self.pending_session.take();

        // A bare `null` body carries no reply at all and counts as a failure
        let content = match outcome {
            Ok(Value::Null) => {
                tracing::warn!("agent replied with a null body");
                TRANSPORT_ERROR_REPLY.to_string()
            }
            Ok(body) => AgentReply::from(body).display_text(),
            Err(e) => {
                tracing::warn!(error = %e, "agent request failed");
                TRANSPORT_ERROR_REPLY.to_string()
            }
        };

        if issued_for.as_deref() != Some(self.session.id()) {
            tracing::warn!("discarding reply for a session that was reset");
            return None;
        }
        Some(self.session.append(Role::Assistant, content))
    }

    /// Run a whole turn against `transport`.
    pub async fn send(
        &mut self,
        transport: &dyn AgentTransport,
        text: &str,
    ) -> Option<&Message> {
        let request = self.begin_turn(text)?;
        let outcome = transport.send(&request).await;
        self.finish_turn(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::FALLBACK_REPLY;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport that replays canned outcomes and records what it was sent.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<Value, TransportError>>>,
        sent: Mutex<Vec<AgentRequest>>,
    }

    impl ScriptedTransport {
        fn with(replies: Vec<Result<Value, TransportError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                sent: Mutex::default(),
            }
        }

        fn sent(&self) -> Vec<AgentRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentTransport for ScriptedTransport {
        async fn send(&self, request: &AgentRequest) -> Result<Value, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(json!({})))
        }
    }

    fn two_agent_config() -> Config {
        let mut config = Config::default();
        config.agents.history = Some("history-agent".into());
        config
    }

    #[tokio::test]
    async fn test_n_turns_produce_2n_messages_in_order() {
        let transport = ScriptedTransport::with(vec![
            Ok(json!({"response": {"data": "one"}})),
            Ok(json!({"response": {"result": "two"}})),
            Ok(json!({"raw_response": "three"})),
        ]);
        let mut conversation = Conversation::new(Config::default());

        for text in ["a", "b", "c"] {
            assert!(conversation.send(&transport, text).await.is_some());
        }

        let transcript = conversation.transcript();
        assert_eq!(transcript.len(), 6);
        let flat: Vec<(Role, &str)> = transcript
            .iter()
            .map(|m| (m.role(), m.content()))
            .collect();
        assert_eq!(
            flat,
            vec![
                (Role::User, "a"),
                (Role::Assistant, "one"),
                (Role::User, "b"),
                (Role::Assistant, "two"),
                (Role::User, "c"),
                (Role::Assistant, "three"),
            ]
        );
        assert!(transcript
            .windows(2)
            .all(|w| w[0].timestamp() <= w[1].timestamp()));
    }

    #[tokio::test]
    async fn test_requests_carry_history_and_session() {
        let transport = ScriptedTransport::with(vec![
            Ok(json!({"response": "Hello"})),
            Ok(json!({"response": "Later"})),
        ]);
        let mut conversation = Conversation::new(Config::default());
        let session_id = conversation.session().id().to_string();

        conversation.send(&transport, "Hi").await;
        conversation.send(&transport, "Bye").await;

        let sent = transport.sent();
        assert_eq!(sent[0].message, "Hi");
        assert_eq!(sent[1].message, "User: Hi\nAssistant: Hello\nUser: Bye");
        assert!(sent.iter().all(|r| r.session_id == session_id));
        assert!(sent.iter().all(|r| r.user_id == "chat-user"));
        assert!(sent.iter().all(|r| r.agent_id == "6935f72d1f3e985c1e35fe6e"));
    }

    #[test]
    fn test_second_send_while_in_flight_is_noop() {
        let mut conversation = Conversation::new(Config::default());

        assert!(conversation.begin_turn("first").is_some());
        assert_eq!(conversation.state(), TurnState::Sending);
        assert_eq!(conversation.transcript().len(), 1);

        assert!(conversation.begin_turn("second").is_none());
        assert_eq!(conversation.transcript().len(), 1);

        conversation.finish_turn(Ok(json!({"response": "done"})));
        assert_eq!(conversation.state(), TurnState::Idle);
        assert!(conversation.begin_turn("third").is_some());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut conversation = Conversation::new(Config::default());
        assert!(conversation.begin_turn("   \n").is_none());
        assert!(conversation.transcript().is_empty());
        assert!(!conversation.is_busy());
    }

    #[tokio::test]
    async fn test_transport_failure_appends_error_reply() {
        let transport = ScriptedTransport::with(vec![Err(TransportError::Timeout)]);
        let mut conversation = Conversation::new(Config::default());

        let reply = conversation.send(&transport, "Hi").await.cloned().unwrap();
        assert_eq!(reply.role(), Role::Assistant);
        assert_eq!(reply.content(), TRANSPORT_ERROR_REPLY);

        let transcript = conversation.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content(), "Hi");
        assert!(!conversation.is_busy());
    }

    #[tokio::test]
    async fn test_conversation_recovers_after_failure() {
        let transport = ScriptedTransport::with(vec![
            Err(TransportError::Status(500)),
            Ok(json!({"response": {"data": "back"}})),
        ]);
        let mut conversation = Conversation::new(Config::default());

        conversation.send(&transport, "one").await;
        let reply = conversation.send(&transport, "two").await.unwrap();
        assert_eq!(reply.content(), "back");
        assert_eq!(conversation.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_unrecognized_reply_uses_fallback() {
        let transport = ScriptedTransport::with(vec![Ok(json!({"unexpected": true}))]);
        let mut conversation = Conversation::new(Config::default());
        let reply = conversation.send(&transport, "Hi").await.unwrap();
        assert_eq!(reply.content(), FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_null_body_appends_error_reply() {
        let transport = ScriptedTransport::with(vec![
            Ok(Value::Null),
            Ok(json!("just a string")),
        ]);
        let mut conversation = Conversation::new(Config::default());

        let reply = conversation.send(&transport, "one").await.unwrap();
        assert_eq!(reply.content(), TRANSPORT_ERROR_REPLY);
        assert!(!conversation.is_busy());

        // Other non-object bodies still fall back to the generic reply
        let reply = conversation.send(&transport, "two").await.unwrap();
        assert_eq!(reply.content(), FALLBACK_REPLY);
    }

    #[test]
    fn test_new_session_clears_transcript_and_changes_id() {
        let mut conversation = Conversation::new(two_agent_config());
        conversation.begin_turn("Hi");
        conversation.finish_turn(Ok(json!({"response": "Hello"})));
        assert!(conversation.toggle_mode());
        let old_id = conversation.session().id().to_string();

        conversation.start_session();

        assert!(conversation.transcript().is_empty());
        assert_ne!(conversation.session().id(), old_id);
        assert_eq!(conversation.mode(), ChatMode::Chat);
    }

    #[test]
    fn test_reply_for_reset_session_is_discarded() {
        let mut conversation = Conversation::new(Config::default());
        conversation.begin_turn("Hi");
        conversation.start_session();

        assert!(conversation
            .finish_turn(Ok(json!({"response": "late"})))
            .is_none());
        assert!(conversation.transcript().is_empty());
        assert!(!conversation.is_busy());
    }

    #[test]
    fn test_finish_without_pending_turn_is_noop() {
        let mut conversation = Conversation::new(Config::default());
        assert!(conversation
            .finish_turn(Ok(json!({"response": "stray"})))
            .is_none());
        assert!(conversation.transcript().is_empty());
    }

    #[test]
    fn test_mode_selects_agent_and_keeps_transcript() {
        let mut conversation = Conversation::new(two_agent_config());
        conversation.begin_turn("Hi");
        conversation.finish_turn(Ok(json!({"response": "Hello"})));

        assert!(conversation.toggle_mode());
        assert_eq!(conversation.mode(), ChatMode::History);
        assert_eq!(conversation.transcript().len(), 2);

        let request = conversation.begin_turn("Summarize").unwrap();
        assert_eq!(request.agent_id, "history-agent");
    }

    #[test]
    fn test_mode_toggle_unavailable_without_history_agent() {
        let mut conversation = Conversation::new(Config::default());
        assert!(!conversation.can_switch_mode());
        assert!(!conversation.toggle_mode());
        assert_eq!(conversation.mode(), ChatMode::Chat);
    }
}
