//! # TitleBar Component
//!
//! Single-line status bar: who is signed in, which region filter is active,
//! whether the listing is restricted to favorites, and the latest status.
//!
//! ```text
//! Atlas | demo | Region: Europe | Favorites | 53 countries
//! Atlas | guest | Region: All | Loading countries...
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub username: Option<String>,
    pub region: Option<String>,
    pub favorites_only: bool,
    pub status_message: String,
}

impl TitleBar {
    fn text(&self) -> String {
        let mut parts = vec![
            self.username.clone().unwrap_or_else(|| "guest".to_string()),
            format!("Region: {}", self.region.as_deref().unwrap_or("All")),
        ];
        if self.favorites_only {
            parts.push("Favorites".to_string());
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.clone());
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("Atlas", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::raw(self.text()),
        ]);
        frame.render_widget(line, area);
    }
}
