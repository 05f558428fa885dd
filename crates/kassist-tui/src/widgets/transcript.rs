//! Transcript widget.
//!
//! User messages hug the right edge, assistant messages the left, each with
//! an `HH:MM` timestamp underneath. The view follows the newest message unless
//! the user has scrolled up.

use crate::ui::theme::{spinner_frame, Styles};
use chrono::Local;
use kassist_engine::{Message, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Narrowest bubble, so short panes still show some text per row.
const MIN_BUBBLE_WIDTH: usize = 12;

/// Horizontal padding inside a bubble (each side).
const BUBBLE_PADDING: usize = 1;

/// Transcript view over the session's messages.
pub struct TranscriptView<'a> {
    messages: &'a [Message],
    thinking: bool,
    tick: usize,
    scroll: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            thinking: false,
            tick: 0,
            scroll: 0,
        }
    }

    /// Show the "Thinking..." row; `tick` drives the spinner.
    #[must_use]
    pub fn thinking(mut self, thinking: bool, tick: usize) -> Self {
        self.thinking = thinking;
        self.tick = tick;
        self
    }

    /// Lines scrolled up from the bottom.
    #[must_use]
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

/// Render all messages into display lines for a pane `width` columns wide.
pub fn transcript_lines(messages: &[Message], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, msg) in messages.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        let style = match msg.role() {
            Role::User => Styles::user_bubble(),
            Role::Assistant => Styles::assistant_bubble(),
        };
        let time = msg
            .timestamp()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        lines.extend(bubble_lines(msg.content(), &time, msg.role(), style, width));
    }
    lines
}

/// Lay out one message bubble plus its timestamp line.
fn bubble_lines(
    content: &str,
    time: &str,
    role: Role,
    style: Style,
    width: usize,
) -> Vec<Line<'static>> {
    let max_bubble = (width * 3 / 4).max(MIN_BUBBLE_WIDTH).min(width);
    let text_width = max_bubble.saturating_sub(2 * BUBBLE_PADDING).max(1);

    let rows: Vec<String> = textwrap::wrap(content, text_width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect();
    let inner_width = rows
        .iter()
        .map(|r| r.width())
        .max()
        .unwrap_or(0)
        .min(text_width);
    let bubble_width = inner_width + 2 * BUBBLE_PADDING;

    let indent = |used: usize| match role {
        Role::User => " ".repeat(width.saturating_sub(used)),
        Role::Assistant => String::new(),
    };

    let pad = " ".repeat(BUBBLE_PADDING);
    let mut lines: Vec<Line<'static>> = rows
        .into_iter()
        .map(|row| {
            let fill = " ".repeat(inner_width.saturating_sub(row.width()));
            Line::from(vec![
                Span::raw(indent(bubble_width)),
                Span::styled(format!("{pad}{row}{fill}{pad}"), style),
            ])
        })
        .collect();

    let time_used = time.width() + BUBBLE_PADDING;
    lines.push(Line::from(vec![
        Span::raw(indent(time_used)),
        Span::styled(format!("{pad}{time}"), Styles::dim()),
    ]));
    lines
}

/// Transcript lines followed by the "Thinking..." row while a reply is
/// pending (`thinking` carries the spinner tick).
pub fn view_lines(
    messages: &[Message],
    width: usize,
    thinking: Option<usize>,
) -> Vec<Line<'static>> {
    let mut lines = transcript_lines(messages, width);
    if let Some(tick) = thinking {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(thinking_line(tick));
    }
    lines
}

fn thinking_line(tick: usize) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {} Thinking... ", spinner_frame(tick)),
        Styles::assistant_bubble(),
    ))
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let thinking = self.thinking.then_some(self.tick);
        let lines = view_lines(self.messages, area.width as usize, thinking);

        // Anchor to the bottom, then step back by the scroll offset
        let height = area.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let start = max_scroll.saturating_sub(self.scroll.min(max_scroll));

        let visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible)
            .style(Styles::default())
            .render(area, buf);
    }
}
