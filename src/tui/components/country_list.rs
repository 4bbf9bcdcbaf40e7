//! # CountryList Component
//!
//! The filtered listing. Favorites are starred; the selection is tracked in a
//! `ListState` owned by `TuiState` so the scroll offset survives redraws.
//!
//! ```text
//! ┌ Countries (3) ───────────────┐
//! │> ★ Japan          Asia       │
//! │    France         Europe     │
//! │  ★ United States  Americas   │
//! └──────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};

use crate::api::Country;
use crate::tui::component::Component;

pub struct CountryList<'a> {
    pub countries: Vec<&'a Country>,
    pub favorites: &'a [String],
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub list_state: &'a mut ListState,
}

impl CountryList<'_> {
    fn is_favorite(&self, country: &Country) -> bool {
        self.favorites.iter().any(|code| *code == country.cca3)
    }

    fn render_message(frame: &mut Frame, area: Rect, block: Block, message: &str, style: Style) {
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

impl Component for CountryList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(format!(" Countries ({}) ", self.countries.len()));

        if let Some(error) = self.error {
            let block = block.title(" Error ").border_style(Style::default().fg(Color::Red));
            Self::render_message(frame, area, block, error, Style::default().fg(Color::Red));
            return;
        }
        if self.is_loading {
            Self::render_message(frame, area, block, "Loading countries...", Style::default());
            return;
        }
        if self.countries.is_empty() {
            Self::render_message(
                frame,
                area,
                block,
                "No countries match the current filters",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let items: Vec<ListItem> = self
            .countries
            .iter()
            .map(|country| {
                let star = if self.is_favorite(country) { "★ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(star, Style::default().fg(Color::Yellow)),
                    Span::raw(country.name.common.clone()),
                    Span::styled(
                        format!("  {}", country.region),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut *self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::country;
    use crate::tui::components::test_render::render_to_string;

    fn sample() -> Vec<Country> {
        vec![
            country("JPN", "Japan", "Asia", 125_836_021),
            country("FRA", "France", "Europe", 67_391_582),
        ]
    }

    #[test]
    fn test_stars_favorites_and_highlights_selection() {
        let countries = sample();
        let favorites = vec!["JPN".to_string()];
        let mut list_state = ListState::default().with_selected(Some(1));
        let mut list = CountryList {
            countries: countries.iter().collect(),
            favorites: &favorites,
            is_loading: false,
            error: None,
            list_state: &mut list_state,
        };
        let text = render_to_string(&mut list, 40, 6);
        assert!(text.contains("Countries (2)"));
        assert!(text.contains("★ Japan"));
        assert!(text.contains(">   France"));
    }

    #[test]
    fn test_loading_and_error_states() {
        let mut list_state = ListState::default();
        let mut list = CountryList {
            countries: Vec::new(),
            favorites: &[],
            is_loading: true,
            error: None,
            list_state: &mut list_state,
        };
        assert!(render_to_string(&mut list, 40, 5).contains("Loading countries..."));

        list.is_loading = false;
        list.error = Some("Failed to fetch countries");
        assert!(render_to_string(&mut list, 40, 5).contains("Failed to fetch countries"));
    }

    #[test]
    fn test_empty_listing_message() {
        let mut list_state = ListState::default();
        let mut list = CountryList {
            countries: Vec::new(),
            favorites: &[],
            is_loading: false,
            error: None,
            list_state: &mut list_state,
        };
        assert!(render_to_string(&mut list, 50, 5).contains("No countries match"));
    }
}
