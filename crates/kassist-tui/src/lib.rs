//! kassist-tui: Terminal chat UI for the kassist agent client
//!
//! This crate provides the interactive layer, including:
//! - The chat screen (header, transcript, input bar, status bar)
//! - Welcome card with suggested prompts
//! - Background dispatch of agent requests so the UI keeps animating

mod app;
mod event;
mod screen;
#[cfg(test)]
pub mod test_utils;
mod ui;
mod widgets;

pub use app::App;
pub use event::{Action, Event, EventHandler};
pub use kassist_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kassist_engine::{AgentRequest, AgentTransport, Config, HttpTransport, TransportError};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde_json::Value;
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle for the request currently in flight.
type PendingReply = JoinHandle<Result<Value, TransportError>>;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let transport: Arc<dyn AgentTransport> = Arc::new(HttpTransport::from_config(&config)?);
    tracing::info!(endpoint = %config.endpoint, "starting tui");

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let size = terminal.size()?;
    app.set_viewport(size.width, size.height);

    // 4 Hz tick rate drives the spinner and notification expiry
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events, transport).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    transport: Arc<dyn AgentTransport>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pending: Option<PendingReply> = None;

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screen::render_chat(app, area, frame.buffer_mut());
        })?;

        if let Some(event) = events.next().await {
            let request = match event {
                Event::Key(key) => handle_key(app, key),
                Event::Paste(text) => {
                    handle_paste(app, &text);
                    None
                }
                Event::Mouse(mouse) => {
                    use crossterm::event::MouseEventKind;
                    match mouse.kind {
                        MouseEventKind::ScrollUp => app.handle_action(Action::ScrollUp),
                        MouseEventKind::ScrollDown => app.handle_action(Action::ScrollDown),
                        _ => None,
                    }
                }
                Event::Tick => {
                    app.tick();
                    None
                }
                Event::Resize(w, h) => {
                    app.set_viewport(w, h);
                    None
                }
            };
            if let Some(request) = request {
                pending = Some(dispatch(Arc::clone(&transport), request));
            }
        }

        poll_pending(app, &mut pending).await;

        if app.should_quit {
            if let Some(handle) = pending.take() {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Run `request` on a background task.
fn dispatch(transport: Arc<dyn AgentTransport>, request: AgentRequest) -> PendingReply {
    tokio::spawn(async move { transport.send(&request).await })
}

/// Hand a finished reply to the app. Does nothing while the request is still running.
async fn poll_pending(app: &mut App, pending: &mut Option<PendingReply>) {
    if !pending.as_ref().is_some_and(JoinHandle::is_finished) {
        return;
    }
    let Some(handle) = pending.take() else {
        return;
    };
    let outcome = handle
        .await
        .unwrap_or_else(|e| Err(TransportError::Task(e.to_string())));
    app.finish_turn(outcome);
}

/// Insert pasted text into the single-line input. Line breaks become spaces.
fn handle_paste(app: &mut App, text: &str) {
    if !app.is_busy() {
        app.input_state.insert_str(&text.replace(['\r', '\n'], " "));
    }
}

/// Route a key press: text editing first, then shortcut actions.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<AgentRequest> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if handle_input_key(app, key) {
        return None;
    }
    app.handle_action(event::key_to_action(key))
}

/// Handle editing keys for the input box.
/// Returns true if the key was consumed.
fn handle_input_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    // The input box is disabled while a reply is pending
    if app.is_busy() {
        return matches!(
            key.code,
            KeyCode::Char(_) | KeyCode::Backspace | KeyCode::Delete
        );
    }

    match key.code {
        KeyCode::Char(c) => app.input_state.insert(c),
        KeyCode::Backspace => app.input_state.backspace(),
        KeyCode::Delete => app.input_state.delete(),
        KeyCode::Left => app.input_state.move_left(),
        KeyCode::Right => app.input_state.move_right(),
        KeyCode::Home => app.input_state.move_home(),
        KeyCode::End => app.input_state.move_end(),
        // History recall while the box is empty or already recalling
        KeyCode::Up
            if app.input_state.is_recalling()
                || (app.input_state.is_empty() && app.input_state.has_history()) =>
        {
            app.input_state.history_prev();
        }
        KeyCode::Down if app.input_state.is_recalling() => app.input_state.history_next(),
        _ => return false,
    }
    true
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }
}
