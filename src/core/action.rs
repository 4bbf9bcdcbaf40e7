//! # Actions
//!
//! Everything that can happen in the explorer becomes an `Action`.
//! User types a letter? That's `Action::QueryChanged(query)`.
//! Listing arrives? That's `Action::CountriesLoaded(countries)`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` describing any I/O the adapter should start. No side effects here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::api::Country;
use crate::api::client::MIN_SUGGESTION_QUERY_CHARS;
use crate::core::session::User;
use crate::core::state::{DetailState, Explorer};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CountriesLoaded(Vec<Country>),
    CountriesFailed(String),
    QueryChanged(String),
    SuggestionsReceived { query: String, countries: Vec<Country> },
    /// Jump to the top suggestion.
    AcceptSuggestion,
    CycleRegion,
    ToggleFavoritesOnly,
    SelectNext,
    SelectPrev,
    ToggleFavorite,
    FavoriteUpdated(User),
    FavoriteFailed(String),
    DetailLoaded(Country),
    DetailFailed { code: String, message: String },
    Quit,
}

/// I/O requested by `update`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Schedule a debounced suggestion lookup for this query.
    FetchSuggestions(String),
    /// Drop any pending suggestion lookup.
    CancelSuggestions,
    /// Toggle this cca3 code in the session store.
    ToggleFavorite(String),
    /// Fetch the full record for this cca3 code.
    FetchDetail(String),
    Quit,
}

pub fn update(state: &mut Explorer, action: Action) -> Effect {
    match action {
        Action::CountriesLoaded(countries) => {
            state.status_message = format!("{} countries", countries.len());
            state.countries = countries;
            state.is_loading = false;
            state.error = None;
            state.clamp_selection();
            Effect::None
        }
        Action::CountriesFailed(message) => {
            state.is_loading = false;
            state.status_message = String::from("Failed to fetch countries");
            state.error = Some(message);
            Effect::None
        }
        Action::QueryChanged(query) => {
            state.filter.query = query;
            state.selected = 0;
            state.suggestions.clear();
            if state.filter.query.trim().chars().count() >= MIN_SUGGESTION_QUERY_CHARS {
                Effect::FetchSuggestions(state.filter.query.clone())
            } else {
                Effect::CancelSuggestions
            }
        }
        Action::SuggestionsReceived { query, countries } => {
            // Results for an older query are stale
            if query == state.filter.query {
                state.suggestions = countries;
            } else {
                debug!("Dropping stale suggestions for '{}'", query);
            }
            Effect::None
        }
        Action::AcceptSuggestion => {
            let Some(code) = state.suggestions.first().map(|c| c.cca3.clone()) else {
                return Effect::None;
            };
            state.suggestions.clear();
            if state.select_code(&code) {
                state.status_message = format!("Showing {code}");
            } else {
                state.status_message = format!("{code} is not in the listing");
            }
            Effect::CancelSuggestions
        }
        Action::CycleRegion => {
            state.filter.cycle_region();
            state.selected = 0;
            state.status_message = format!(
                "Region: {}",
                state.filter.region.as_deref().unwrap_or("All")
            );
            Effect::None
        }
        Action::ToggleFavoritesOnly => {
            if state.username.is_none() {
                state.status_message = String::from("Log in to view favorite countries");
                return Effect::None;
            }
            state.favorites_only = !state.favorites_only;
            state.selected = 0;
            state.status_message = if state.favorites_only {
                String::from("Showing favorites")
            } else {
                String::from("Showing all countries")
            };
            Effect::None
        }
        Action::SelectNext => {
            let len = state.visible().len();
            if len > 0 {
                state.selected = (state.selected + 1).min(len - 1);
            }
            Effect::None
        }
        Action::SelectPrev => {
            state.selected = state.selected.saturating_sub(1);
            Effect::None
        }
        Action::ToggleFavorite => {
            if state.username.is_none() {
                state.status_message = String::from("Please login to save favorite countries");
                return Effect::None;
            }
            match state.selected_country() {
                Some(country) => Effect::ToggleFavorite(country.cca3.clone()),
                None => Effect::None,
            }
        }
        Action::FavoriteUpdated(user) => {
            state.set_user(Some(&user));
            state.status_message = format!("{} favorites", state.favorites.len());
            state.clamp_selection();
            Effect::None
        }
        Action::FavoriteFailed(message) => {
            state.status_message = format!("Failed to update favorites: {message}");
            Effect::None
        }
        Action::DetailLoaded(country) => {
            // A late answer for a country that is no longer selected is stale
            if state.detail.code() == Some(country.cca3.as_str()) {
                state.detail = DetailState::Loaded(country);
            } else {
                debug!("Dropping stale detail for {}", country.cca3);
            }
            Effect::None
        }
        Action::DetailFailed { code, message } => {
            if state.detail.code() == Some(code.as_str()) {
                state.detail = DetailState::Failed { code, message };
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

/// Requests the full record when the selection has moved to a country the
/// detail pane does not hold yet. Call after every `update`.
pub fn sync_detail(state: &mut Explorer) -> Effect {
    let selected = state.selected_country().map(|c| c.cca3.clone());
    match selected {
        Some(code) if state.detail.code() != Some(code.as_str()) => {
            state.detail = DetailState::Loading(code.clone());
            Effect::FetchDetail(code)
        }
        Some(_) => Effect::None,
        None => {
            state.detail = DetailState::Idle;
            Effect::None
        }
    }
}
