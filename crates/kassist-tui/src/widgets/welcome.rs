//! Empty-conversation card with greeting and suggested prompts.

use crate::ui::layout::centered_fixed;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Suggestions reachable through function keys (F1..F4).
pub const MAX_SUGGESTIONS: usize = 4;

const CARD_WIDTH: u16 = 65;

/// Welcome card shown while the transcript is empty.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │   Hi! How can I help you today?      │
/// │                                      │
/// │  Suggested prompts to get started:   │
/// │   F1  What can you help me with...   │
/// └──────────────────────────────────────┘
/// ```
pub struct WelcomeCard<'a> {
    prompts: &'a [String],
}

impl<'a> WelcomeCard<'a> {
    pub fn new(prompts: &'a [String]) -> Self {
        Self { prompts }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled("Hi! How can I help you today?", Styles::highlight()))
                .alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled(
                "Ask me anything and I'll do my best to help",
                Styles::dim(),
            ))
            .alignment(Alignment::Center),
            Line::from(Span::styled("with accurate, helpful responses.", Styles::dim()))
                .alignment(Alignment::Center),
            Line::from(""),
        ];

        if !self.prompts.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Suggested prompts to get started:",
                Styles::dim(),
            )));
            lines.push(Line::from(""));
            for (i, prompt) in self.prompts.iter().take(MAX_SUGGESTIONS).enumerate() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  F{} ", i + 1), Styles::active()),
                    Span::styled(prompt.as_str(), Styles::default()),
                ]));
            }
        }

        lines
    }
}

impl Widget for WelcomeCard<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = lines.len() as u16 + 2;
        let card = centered_fixed(CARD_WIDTH, height, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        Paragraph::new(lines)
            .block(block)
            .style(Styles::default())
            .render(card, buf);
    }
}
