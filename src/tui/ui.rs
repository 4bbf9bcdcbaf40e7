use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::state::Explorer;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CountryDetail, CountryList, SuggestionList, TitleBar};

const HELP_TEXT: &str =
    "type to filter · Enter open suggestion · ↑/↓ select · Tab region · Ctrl+F favorite · Ctrl+V favorites only · Esc quit";

pub fn draw_ui(frame: &mut Frame, explorer: &Explorer, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};

    let suggestions_height = SuggestionList::height(&explorer.suggestions);
    let layout = Layout::vertical([
        Length(1),
        Length(3),
        Length(suggestions_height),
        Min(0),
        Length(1),
    ]);
    let [title_area, search_area, suggestions_area, main_area, help_area] =
        layout.areas(frame.area());
    let [list_area, detail_area] =
        Layout::horizontal([Percentage(40), Percentage(60)]).areas(main_area);

    TitleBar {
        username: explorer.username.clone(),
        region: explorer.filter.region.clone(),
        favorites_only: explorer.favorites_only,
        status_message: explorer.status_message.clone(),
    }
    .render(frame, title_area);

    tui.search_box.render(frame, search_area);

    if suggestions_height > 0 {
        SuggestionList {
            suggestions: &explorer.suggestions,
        }
        .render(frame, suggestions_area);
    }

    let visible = explorer.visible();
    let selection = (!visible.is_empty()).then_some(explorer.selected);
    tui.list_state.select(selection);
    CountryList {
        countries: visible,
        favorites: &explorer.favorites,
        is_loading: explorer.is_loading,
        error: explorer.error.as_deref(),
        list_state: &mut tui.list_state,
    }
    .render(frame, list_area);

    let selected = explorer.selected_country();
    CountryDetail {
        country: selected,
        detail: &explorer.detail,
        is_favorite: selected.is_some_and(|c| explorer.is_favorite(c)),
        signed_in: explorer.username.is_some(),
    }
    .render(frame, detail_area);

    frame.render_widget(
        Line::styled(HELP_TEXT, Style::default().fg(Color::DarkGray)),
        help_area,
    );
}
