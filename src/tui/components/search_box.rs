//! # SearchBox Component
//!
//! Single-line query input. Owns the text buffer; every edit emits
//! `SearchEvent::Changed` with the full query so the core can refilter and
//! schedule a (debounced) suggestion lookup. The cursor always sits at the end.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Changed(String),
    Submit,
}

#[derive(Debug, Default)]
pub struct SearchBox {
    buffer: String,
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replaces the buffer without emitting an event (used when the core
    /// rewrites the query, e.g. after jumping to a suggestion).
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
    }
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SearchEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
            }
            TuiEvent::Paste(text) => {
                // Queries are one line
                let flattened: String = text.lines().collect::<Vec<_>>().join(" ");
                self.buffer.push_str(&flattened);
            }
            TuiEvent::Backspace => {
                self.buffer.pop()?;
            }
            TuiEvent::ClearInput => {
                if self.buffer.is_empty() {
                    return None;
                }
                self.buffer.clear();
            }
            TuiEvent::Submit => return Some(SearchEvent::Submit),
            _ => return None,
        }
        Some(SearchEvent::Changed(self.buffer.clone()))
    }
}

impl Component for SearchBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" Search ")
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new("Search for a country...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
        } else {
            Paragraph::new(self.buffer.as_str()).block(block)
        };
        frame.render_widget(paragraph, area);

        let inner_width = area.width.saturating_sub(2);
        let text_width = u16::try_from(self.buffer.width()).unwrap_or(u16::MAX);
        let x = area.x + 1 + text_width.min(inner_width.saturating_sub(1));
        frame.set_cursor_position((x, area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::test_render::render_to_string;

    #[test]
    fn test_typing_emits_full_query() {
        let mut search = SearchBox::new();
        search.handle_event(&TuiEvent::InputChar('j'));
        let event = search.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(event, Some(SearchEvent::Changed("ja".to_string())));
        assert_eq!(search.text(), "ja");
    }

    #[test]
    fn test_backspace_on_empty_is_silent() {
        let mut search = SearchBox::new();
        assert_eq!(search.handle_event(&TuiEvent::Backspace), None);

        search.set_text("ab");
        assert_eq!(
            search.handle_event(&TuiEvent::Backspace),
            Some(SearchEvent::Changed("a".to_string()))
        );
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut search = SearchBox::new();
        let event = search.handle_event(&TuiEvent::Paste("new\nzealand".to_string()));
        assert_eq!(event, Some(SearchEvent::Changed("new zealand".to_string())));
    }

    #[test]
    fn test_clear_and_submit() {
        let mut search = SearchBox::new();
        assert_eq!(search.handle_event(&TuiEvent::ClearInput), None);
        search.set_text("peru");
        assert_eq!(
            search.handle_event(&TuiEvent::ClearInput),
            Some(SearchEvent::Changed(String::new()))
        );
        assert_eq!(search.handle_event(&TuiEvent::Submit), Some(SearchEvent::Submit));
        assert_eq!(search.handle_event(&TuiEvent::CursorUp), None);
    }

    #[test]
    fn test_placeholder_when_empty() {
        let mut search = SearchBox::new();
        let text = render_to_string(&mut search, 40, 3);
        assert!(text.contains("Search for a country..."));

        search.set_text("Peru");
        let text = render_to_string(&mut search, 40, 3);
        assert!(text.contains("Peru"));
        assert!(!text.contains("Search for a country..."));
    }
}
