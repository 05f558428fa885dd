//! One-line header: app title on the left, mode and session on the right.

use crate::ui::theme::{Palette, Styles};
use kassist_engine::ChatMode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

/// Characters of the session id shown in the header.
const SESSION_ID_PREFIX: usize = 8;

pub struct Header<'a> {
    title: &'a str,
    session_id: &'a str,
    mode: Option<ChatMode>,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str, session_id: &'a str) -> Self {
        Self {
            title,
            session_id,
            mode: None,
        }
    }

    /// Show the active mode (only when switching modes is possible).
    #[must_use]
    pub fn mode(mut self, mode: Option<ChatMode>) -> Self {
        self.mode = mode;
        self
    }

    fn right_text(&self) -> String {
        let session: String = self.session_id.chars().take(SESSION_ID_PREFIX).collect();
        match self.mode {
            Some(mode) => format!("[{}]  session {session}", mode.display_name()),
            None => format!("session {session}"),
        }
    }
}

impl Widget for Header<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(Palette::BG);
        }

        let left = Line::from(vec![
            Span::styled(
                " K ",
                Styles::default()
                    .bg(Palette::ACCENT)
                    .fg(Palette::BG)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ", Styles::default()),
            Span::styled(self.title, Styles::title().bg(Palette::BG)),
        ]);
        buf.set_line(area.x, area.y, &left, area.width);

        let right = self.right_text();
        let right_width = right.width() as u16;
        let left_width = left.width() as u16;
        if left_width + right_width + 2 <= area.width {
            let x = area.x + area.width - right_width - 1;
            buf.set_string(x, area.y, &right, Styles::dim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    fn render(header: Header<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        header.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_header_shows_title_and_short_session() {
        let text = render(Header::new("Knowledge Assistant", "0123456789abcdef"), 80);
        assert!(text.contains("Knowledge Assistant"));
        assert!(text.contains("session 01234567"));
        assert!(!text.contains("89abcdef"));
    }

    #[test]
    fn test_header_shows_mode_when_set() {
        let header = Header::new("Knowledge Assistant", "abc").mode(Some(ChatMode::History));
        assert!(render(header, 80).contains("[History]"));
    }

    #[test]
    fn test_header_drops_right_side_when_narrow() {
        let text = render(Header::new("Knowledge Assistant", "0123456789"), 30);
        assert!(text.contains("Knowledge"));
        assert!(!text.contains("session"));
    }
}
