//! # TUI Adapter
//!
//! The ratatui-specific layer behind `atlas explore`. Handles terminal I/O,
//! renders the explorer, and translates keyboard events into `core::Action`s.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Background work
//!
//! Network and storage calls never run on the event loop. They are spawned on
//! the tokio runtime and report back by sending an `Action` over a std channel,
//! which the loop drains between frames:
//!
//! - the country listing, fetched once at startup
//! - type-ahead suggestions, scheduled through a `Debouncer` so a burst of
//!   keystrokes issues one lookup
//! - the full record of the selected country, since listing records are trimmed
//! - favorite toggles, written through the `SessionStore`

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::widgets::ListState;

use crate::api::CountrySource;
use crate::core::action::{Action, Effect, sync_detail, update};
use crate::core::config::ResolvedConfig;
use crate::core::debounce::Debouncer;
use crate::core::session::SessionStore;
use crate::core::state::Explorer;
use crate::tui::component::EventHandler;
use crate::tui::components::{SearchBox, SearchEvent};
use crate::tui::event::{TuiEvent, poll_event};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search_box: SearchBox,
    pub list_state: ListState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            search_box: SearchBox::new(),
            list_state: ListState::default(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> Self {
        match execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => info!("Terminal modes enabled (bracketed paste)"),
            Err(e) => warn!("Could not enable bracketed paste: {}", e),
        }
        Self
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
    }
}

/// Runs the interactive explorer until the user quits.
///
/// Must be called from within a tokio runtime; background fetches are spawned on it.
pub fn run(
    config: &ResolvedConfig,
    session: Arc<SessionStore>,
    source: Arc<dyn CountrySource>,
) -> std::io::Result<()> {
    let mut explorer = Explorer::new(session.current_user().as_ref());
    let mut tui = TuiState::new();
    let mut debouncer = Debouncer::new(config.debounce);
    // Holding an arrow key should not fetch every country it passes
    let mut detail_debouncer = Debouncer::new(config.debounce);

    let (tx, rx) = mpsc::channel();
    spawn_listing(source.clone(), tx.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true;
    'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &explorer, &mut tui))?;
            needs_redraw = false;
        }

        let mut effects = Vec::new();
        if let Some(event) = poll_event(POLL_INTERVAL) {
            needs_redraw = true;
            if let Some(action) = map_event(&mut tui, event) {
                effects.push(update(&mut explorer, action));
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            effects.push(update(&mut explorer, action));
        }
        effects.push(sync_detail(&mut explorer));

        for effect in effects {
            match effect {
                Effect::None => {}
                Effect::Quit => break 'main,
                Effect::FetchSuggestions(query) => {
                    let source = source.clone();
                    let tx = tx.clone();
                    debouncer.call(async move {
                        let countries = source.get_country_suggestions(&query).await;
                        if tx
                            .send(Action::SuggestionsReceived { query, countries })
                            .is_err()
                        {
                            warn!("Failed to send suggestions: receiver dropped");
                        }
                    });
                }
                Effect::CancelSuggestions => debouncer.cancel(),
                Effect::ToggleFavorite(code) => {
                    spawn_toggle_favorite(session.clone(), code, tx.clone());
                }
                Effect::FetchDetail(code) => {
                    needs_redraw = true;
                    detail_debouncer.call(fetch_detail(source.clone(), code, tx.clone()));
                }
            }
        }

        // The core may rewrite the query (accepting a suggestion clears filters)
        if tui.search_box.text() != explorer.filter.query {
            tui.search_box.set_text(&explorer.filter.query);
        }
    }

    info!("Explorer closed");
    Ok(())
}

/// Routes a terminal event to the search box or straight to the core.
fn map_event(tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::CursorUp => Some(Action::SelectPrev),
        TuiEvent::CursorDown => Some(Action::SelectNext),
        TuiEvent::CycleRegion => Some(Action::CycleRegion),
        TuiEvent::ToggleFavorite => Some(Action::ToggleFavorite),
        TuiEvent::ToggleFavoritesOnly => Some(Action::ToggleFavoritesOnly),
        TuiEvent::Resize => None,
        other => match tui.search_box.handle_event(&other)? {
            SearchEvent::Changed(query) => Some(Action::QueryChanged(query)),
            SearchEvent::Submit => Some(Action::AcceptSuggestion),
        },
    }
}

fn spawn_listing(source: Arc<dyn CountrySource>, tx: mpsc::Sender<Action>) {
    info!("Fetching country listing");
    tokio::spawn(async move {
        let action = match source.get_all_countries().await {
            Ok(countries) => {
                info!("Loaded {} countries", countries.len());
                Action::CountriesLoaded(countries)
            }
            Err(e) => {
                warn!("Listing fetch failed: {}", e);
                Action::CountriesFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send listing: receiver dropped");
        }
    });
}

async fn fetch_detail(source: Arc<dyn CountrySource>, code: String, tx: mpsc::Sender<Action>) {
    debug!("Fetching detail for {}", code);
    let action = match source.get_country_by_code(&code).await {
        Ok(countries) => match countries.into_iter().next() {
            Some(country) => Action::DetailLoaded(country),
            None => Action::DetailFailed {
                message: format!("Failed to fetch country with code: {code}"),
                code,
            },
        },
        Err(e) => {
            warn!("Detail fetch for {} failed: {}", code, e);
            Action::DetailFailed {
                code,
                message: e.to_string(),
            }
        }
    };
    if tx.send(action).is_err() {
        warn!("Failed to send detail: receiver dropped");
    }
}

fn spawn_toggle_favorite(session: Arc<SessionStore>, code: String, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let action = match session.toggle_favorite(&code).await {
            Ok(user) => Action::FavoriteUpdated(user),
            Err(e) => {
                warn!("Toggling favorite {} failed: {}", code, e);
                Action::FavoriteFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send favorite update: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_keys_bypass_search_box() {
        let mut tui = TuiState::new();
        assert_eq!(map_event(&mut tui, TuiEvent::CursorDown), Some(Action::SelectNext));
        assert_eq!(map_event(&mut tui, TuiEvent::CycleRegion), Some(Action::CycleRegion));
        assert_eq!(map_event(&mut tui, TuiEvent::Resize), None);
        assert!(tui.search_box.text().is_empty());
    }

    #[test]
    fn test_typing_becomes_query_change() {
        let mut tui = TuiState::new();
        map_event(&mut tui, TuiEvent::InputChar('p'));
        assert_eq!(
            map_event(&mut tui, TuiEvent::InputChar('e')),
            Some(Action::QueryChanged("pe".to_string()))
        );
        assert_eq!(map_event(&mut tui, TuiEvent::Submit), Some(Action::AcceptSuggestion));
    }

    #[tokio::test]
    async fn test_toggle_favorite_reports_back() {
        let session = crate::test_support::test_session();
        session.login("demo", "password").await.unwrap();
        let (tx, rx) = mpsc::channel();

        spawn_toggle_favorite(session.clone(), "FRA".to_string(), tx);
        tokio::time::sleep(Duration::from_millis(50)).await;

        match rx.try_recv() {
            Ok(Action::FavoriteUpdated(user)) => assert!(user.favorite_countries.contains("FRA")),
            other => panic!("expected FavoriteUpdated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_detail_sends_full_record() {
        use crate::test_support::{StaticSource, country};

        let mut full = country("PER", "Peru", "Americas", 32_971_846);
        full.area = Some(1_285_216.0);
        let source: Arc<dyn CountrySource> = Arc::new(StaticSource::new(vec![full.clone()]));
        let (tx, rx) = mpsc::channel();

        fetch_detail(source.clone(), "PER".to_string(), tx.clone()).await;
        assert_eq!(rx.try_recv().unwrap(), Action::DetailLoaded(full));

        fetch_detail(source, "XXX".to_string(), tx).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            Action::DetailFailed {
                code: "XXX".to_string(),
                message: "Failed to fetch country with code: XXX".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_favorite_when_signed_out() {
        let session = crate::test_support::test_session();
        let (tx, rx) = mpsc::channel();

        spawn_toggle_favorite(session, "FRA".to_string(), tx);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(rx.try_recv(), Ok(Action::FavoriteFailed(_))));
    }
}
