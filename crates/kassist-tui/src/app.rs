//! Application state and update logic for the kassist TUI.

use crate::event::Action;
use crate::ui::layout::chat_layout;
use crate::widgets::{view_lines, TextInputState, MAX_SUGGESTIONS};
use kassist_engine::{AgentRequest, Config, Conversation, Message, TransportError};
use ratatui::layout::Rect;
use serde_json::Value;

/// Lines moved by PageUp/PageDown.
const PAGE_SCROLL: usize = 10;

/// Ticks a notification stays visible (about three seconds at 4 Hz).
const NOTIFICATION_TICKS: usize = 12;

/// Main application state.
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Session, transcript and request lifecycle.
    pub conversation: Conversation,

    /// Text input state for the message box.
    pub input_state: TextInputState,

    /// Transcript lines scrolled up from the bottom (0 = follow newest).
    pub transcript_scroll: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Temporary notification shown in the status bar.
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Last known terminal size, used to bound scrolling.
    viewport: Rect,
}

impl App {
    /// Create a new app for the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            should_quit: false,
            conversation: Conversation::new(config),
            input_state: TextInputState::new(),
            transcript_scroll: 0,
            tick: 0,
            notification: None,
            notification_ttl: 0,
            viewport: Rect::new(0, 0, 80, 24),
        }
    }

    /// Create an app with default configuration for tests.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(Config::default())
    }

    pub fn transcript(&self) -> &[Message] {
        self.conversation.transcript()
    }

    /// Whether a reply is pending.
    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// Suggested prompts offered on the empty conversation screen.
    pub fn suggestions(&self) -> &[String] {
        let prompts = &self.conversation.config().suggested_prompts;
        &prompts[..prompts.len().min(MAX_SUGGESTIONS)]
    }

    /// Record the terminal size.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.transcript_scroll = self.transcript_scroll.min(self.max_scroll());
    }

    /// Largest scroll offset that still fills the transcript pane, counting
    /// the "Thinking..." rows shown while a reply is pending.
    fn max_scroll(&self) -> usize {
        let area = chat_layout(self.viewport).transcript;
        let thinking = self.is_busy().then_some(self.tick);
        view_lines(self.transcript(), area.width as usize, thinking)
            .len()
            .saturating_sub(area.height as usize)
    }

    /// Handle an action. Returns a request when the action started a turn.
    pub fn handle_action(&mut self, action: Action) -> Option<AgentRequest> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::NewChat => {
                self.conversation.start_session();
                self.input_state.clear();
                self.transcript_scroll = 0;
                self.set_notification("Started a new chat".to_string());
            }
            Action::ToggleMode => {
                if self.conversation.toggle_mode() {
                    let mode = self.conversation.mode().display_name();
                    self.set_notification(format!("Switched to {mode} mode"));
                } else {
                    self.set_notification("History mode is not configured".to_string());
                }
            }
            Action::Suggestion(index) => self.fill_suggestion(index),
            Action::Submit => return self.submit(),
            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::PageUp => self.scroll_up(PAGE_SCROLL),
            Action::PageDown => self.scroll_down(PAGE_SCROLL),
            Action::None => {}
        }
        None
    }

    /// Send the input box content.
    ///
    /// While a reply is pending the input is left untouched.
    pub fn submit(&mut self) -> Option<AgentRequest> {
        if self.is_busy() || self.input_state.is_blank() {
            return None;
        }
        let text = self.input_state.submit();
        let request = self.conversation.begin_turn(&text)?;
        self.transcript_scroll = 0;
        Some(request)
    }

    /// Copy a suggested prompt into the input box.
    ///
    /// Suggestions are only offered before the first message.
    fn fill_suggestion(&mut self, index: usize) {
        if self.is_busy() || !self.transcript().is_empty() {
            return;
        }
        if let Some(prompt) = self.suggestions().get(index).cloned() {
            self.input_state.set(prompt);
        }
    }

    /// Apply the outcome of the in-flight request.
    pub fn finish_turn(&mut self, outcome: Result<Value, TransportError>) {
        if self.conversation.finish_turn(outcome).is_some() {
            self.transcript_scroll = 0;
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = (self.transcript_scroll + lines).min(self.max_scroll());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Set a temporary notification message.
    fn set_notification(&mut self, msg: String) {
        self.notification = Some(msg);
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Called on each tick event.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }
}
