//! # SuggestionList Component
//!
//! Type-ahead matches shown under the search box. Enter jumps to the first one.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem};

use crate::api::Country;
use crate::tui::component::Component;

pub struct SuggestionList<'a> {
    pub suggestions: &'a [Country],
}

impl SuggestionList<'_> {
    /// Rows needed to show every suggestion plus borders; 0 when there are none.
    pub fn height(suggestions: &[Country]) -> u16 {
        if suggestions.is_empty() {
            0
        } else {
            u16::try_from(suggestions.len()).unwrap_or(u16::MAX).saturating_add(2)
        }
    }
}

impl Component for SuggestionList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, country)| {
                let style = if i == 0 {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<4}", country.cca3), Style::default().fg(Color::DarkGray)),
                    Span::styled(country.name.common.clone(), style),
                ]))
            })
            .collect();

        let block = Block::bordered()
            .title(" Suggestions (Enter to open) ")
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(List::new(items).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::country;
    use crate::tui::components::test_render::render_to_string;

    #[test]
    fn test_height() {
        assert_eq!(SuggestionList::height(&[]), 0);
        let two = vec![country("PER", "Peru", "Americas", 1), country("PRT", "Portugal", "Europe", 1)];
        assert_eq!(SuggestionList::height(&two), 4);
    }

    #[test]
    fn test_renders_names_and_codes() {
        let suggestions = vec![country("PER", "Peru", "Americas", 1)];
        let mut list = SuggestionList {
            suggestions: &suggestions,
        };
        let text = render_to_string(&mut list, 40, 3);
        assert!(text.contains("PER"));
        assert!(text.contains("Peru"));
    }
}
