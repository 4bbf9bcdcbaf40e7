//! # CountryDetail Component
//!
//! Labelled facts for the selected country, with a favorite marker in the title.
//! Facts come from the full record; until it arrives only the name is known.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::api::Country;
use crate::core::state::DetailState;
use crate::tui::component::Component;

const LABEL_WIDTH: usize = 18;

pub struct CountryDetail<'a> {
    /// The listing record under the cursor.
    pub country: Option<&'a Country>,
    pub detail: &'a DetailState,
    pub is_favorite: bool,
    pub signed_in: bool,
}

impl CountryDetail<'_> {
    fn fact_lines(country: &Country) -> Vec<Line<'static>> {
        country
            .facts()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!("{label:<LABEL_WIDTH$}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            })
            .collect()
    }
}

impl Component for CountryDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(country) = self.country else {
            let placeholder = Paragraph::new("Select a country to see its details")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::bordered().title(" Details "));
            frame.render_widget(placeholder, area);
            return;
        };

        let marker = if self.is_favorite { " ★" } else { "" };
        let title = format!(" {}{} ", country.name.common, marker);

        let mut lines = match self.detail {
            DetailState::Loaded(full) if full.cca3 == country.cca3 => Self::fact_lines(full),
            DetailState::Failed { code, message } if *code == country.cca3 => {
                vec![Line::styled(message.clone(), Style::default().fg(Color::Red))]
            }
            _ => vec![Line::styled(
                "Loading details...",
                Style::default().fg(Color::DarkGray),
            )],
        };

        lines.push(Line::raw(""));
        let hint = match (self.signed_in, self.is_favorite) {
            (false, _) => "Log in with `atlas login` to save favorites",
            (true, true) => "Ctrl+F to remove from favorites",
            (true, false) => "Ctrl+F to add to favorites",
        };
        lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)));

        let border_style = if self.is_favorite {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let paragraph = Paragraph::new(lines)
            .block(Block::bordered().title(title).border_style(border_style))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
