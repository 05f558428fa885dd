//! The chat screen: header, transcript or welcome card, input bar, status bar.

use crate::app::App;
use crate::ui::layout::chat_layout;
use crate::ui::theme::Styles;
use crate::widgets::{Header, InputBar, KeyHint, StatusBar, TranscriptView, WelcomeCard};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

const TITLE: &str = "Knowledge Assistant";

/// Render the whole chat screen.
pub fn render_chat(app: &App, area: Rect, buf: &mut Buffer) {
    buf.set_style(area, Styles::default());
    let layout = chat_layout(area);
    let conversation = &app.conversation;

    let mode = conversation
        .can_switch_mode()
        .then_some(conversation.mode());
    Header::new(TITLE, conversation.session().id())
        .mode(mode)
        .render(layout.header, buf);

    if app.transcript().is_empty() && !app.is_busy() {
        WelcomeCard::new(app.suggestions()).render(layout.transcript, buf);
    } else {
        TranscriptView::new(app.transcript())
            .thinking(app.is_busy(), app.tick)
            .scroll(app.transcript_scroll)
            .render(layout.transcript, buf);
    }

    InputBar::new(&app.input_state)
        .loading(app.is_busy(), app.tick)
        .render(layout.input, buf);

    let mut hints = vec![
        KeyHint::new("Enter", "Send"),
        KeyHint::new("Ctrl+N", "New chat"),
    ];
    if conversation.can_switch_mode() {
        hints.push(KeyHint::new("Ctrl+T", "Mode"));
    }
    hints.push(KeyHint::new("Esc", "Quit"));

    let mut status = StatusBar::new(conversation.mode().display_name()).hints(hints);
    if let Some(note) = app.notification.as_deref() {
        status = status.right(note);
    }
    status.render(layout.status, buf);
}
