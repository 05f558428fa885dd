//! Full-width input bar widget.
//!
//! Always visible below the transcript. Disabled while a reply is pending.

use crate::ui::theme::{spinner_frame, Styles, Symbols};
use crate::widgets::text_input::TextInputState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

const PROMPT: &str = "> ";
const PLACEHOLDER: &str = "Type your message...";

/// Full-width input bar for text entry.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    loading: bool,
    tick: usize,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState) -> Self {
        Self {
            input,
            loading: false,
            tick: 0,
        }
    }

    /// Show the disabled waiting state instead of the editable text.
    #[must_use]
    pub fn loading(mut self, loading: bool, tick: usize) -> Self {
        self.loading = loading;
        self.tick = tick;
        self
    }

    /// Build the visible line for a text area `width` columns wide.
    ///
    /// Text scrolls horizontally so the cursor stays in view.
    fn build_input_line(&self, width: usize) -> Line<'static> {
        if self.input.is_empty() {
            return Line::from(vec![
                Span::styled(PROMPT, Styles::active()),
                Span::styled(Symbols::CURSOR, Styles::active()),
                Span::styled(PLACEHOLDER, Styles::dim()),
            ]);
        }

        let chars: Vec<char> = self.input.content().chars().collect();
        let cursor = self.input.cursor().min(chars.len());
        let avail = width.saturating_sub(PROMPT.len() + 1).max(1);

        // Walk back from the cursor until the window is full
        let mut start = cursor;
        let mut used = 0;
        while start > 0 {
            let w = chars[start - 1].width().unwrap_or(0);
            if used + w > avail {
                break;
            }
            used += w;
            start -= 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let after: String = chars[cursor..].iter().collect();
        Line::from(vec![
            Span::styled(PROMPT, Styles::active()),
            Span::styled(before, Styles::default()),
            Span::styled(Symbols::CURSOR, Styles::active()),
            Span::styled(after, Styles::default()),
        ])
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.loading {
            Styles::border()
        } else {
            Styles::border_active()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());

        let inner_width = area.width.saturating_sub(2) as usize;
        let paragraph = if self.loading {
            Paragraph::new(format!("{} Thinking...", spinner_frame(self.tick)))
                .block(block)
                .style(Styles::dim())
        } else {
            Paragraph::new(self.build_input_line(inner_width))
                .block(block)
                .style(Styles::default())
        };

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(bar: InputBar<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 3);
        let mut buf = Buffer::empty(area);
        bar.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_empty_input_shows_placeholder() {
        let input = TextInputState::new();
        assert!(render(InputBar::new(&input), 60).contains("Type your message..."));
    }

    #[test]
    fn test_input_shows_text_with_cursor() {
        let mut input = TextInputState::new();
        input.insert_str("Hello");
        input.move_left();
        let text = render(InputBar::new(&input), 60);
        assert!(text.contains("> Hell█o"));
    }

    #[test]
    fn test_loading_replaces_input() {
        let mut input = TextInputState::new();
        input.insert_str("draft");
        let text = render(InputBar::new(&input).loading(true, 0), 60);
        assert!(text.contains("Thinking..."));
        assert!(!text.contains("draft"));
    }

    #[test]
    fn test_long_input_keeps_cursor_visible() {
        let mut input = TextInputState::new();
        input.insert_str(&"a".repeat(100));
        input.insert_str("END");
        let text = render(InputBar::new(&input), 30);
        assert!(text.contains("END█"));
    }
}
