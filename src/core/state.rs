//! # Explorer State
//!
//! Core business state for the interactive explorer. Domain data only, no
//! terminal types. Presentation state (list scroll, input cursor) lives in `tui`.
//!
//! ```text
//! Explorer
//! ├── countries: Vec<Country>        // full listing, upstream order
//! ├── filter: CountryFilter          // query + region
//! ├── favorites_only: bool           // restrict listing to favorites
//! ├── favorites: Vec<String>         // snapshot of the user's cca3 codes
//! ├── username: Option<String>       // None = anonymous
//! ├── selected: usize                // index into visible()
//! ├── suggestions: Vec<Country>      // type-ahead results for filter.query
//! ├── detail: DetailState            // full record for the selected country
//! ├── status_message: String         // status bar text
//! ├── is_loading: bool               // waiting for the listing
//! └── error: Option<String>          // listing failed to load
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::api::Country;
use crate::core::catalog::CountryFilter;
use crate::core::session::User;

/// The full record behind the detail pane. Listing records carry only a
/// subset of fields, so the selected country is fetched again by code.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailState {
    #[default]
    Idle,
    Loading(String),
    Loaded(Country),
    Failed { code: String, message: String },
}

impl DetailState {
    /// The cca3 this state belongs to.
    pub fn code(&self) -> Option<&str> {
        match self {
            DetailState::Idle => None,
            DetailState::Loading(code) => Some(code),
            DetailState::Loaded(country) => Some(&country.cca3),
            DetailState::Failed { code, .. } => Some(code),
        }
    }
}

pub struct Explorer {
    pub countries: Vec<Country>,
    pub filter: CountryFilter,
    pub favorites_only: bool,
    pub favorites: Vec<String>,
    pub username: Option<String>,
    pub selected: usize,
    pub suggestions: Vec<Country>,
    pub detail: DetailState,
    pub status_message: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Explorer {
    pub fn new(user: Option<&User>) -> Self {
        let mut explorer = Self {
            countries: Vec::new(),
            filter: CountryFilter::default(),
            favorites_only: false,
            favorites: Vec::new(),
            username: None,
            selected: 0,
            suggestions: Vec::new(),
            detail: DetailState::Idle,
            status_message: String::from("Loading countries..."),
            is_loading: true,
            error: None,
        };
        explorer.set_user(user);
        explorer
    }

    pub fn set_user(&mut self, user: Option<&User>) {
        self.username = user.map(|u| u.username.clone());
        self.favorites = user
            .map(|u| u.favorite_countries.as_slice().to_vec())
            .unwrap_or_default();
    }

    pub fn is_favorite(&self, country: &Country) -> bool {
        self.favorites.iter().any(|code| *code == country.cca3)
    }

    /// Countries passing the filter (and the favorites toggle), in listing order.
    pub fn visible(&self) -> Vec<&Country> {
        self.countries
            .iter()
            .filter(|c| self.filter.matches(c))
            .filter(|c| !self.favorites_only || self.is_favorite(c))
            .collect()
    }

    pub fn selected_country(&self) -> Option<&Country> {
        self.visible().get(self.selected).copied()
    }

    /// Keeps `selected` inside the visible list.
    pub fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }

    /// Moves the selection onto the country with `cca3`, clearing filters that hide it.
    pub fn select_code(&mut self, cca3: &str) -> bool {
        if !self.countries.iter().any(|c| c.cca3 == cca3) {
            return false;
        }
        let position = |explorer: &Explorer| {
            explorer
                .visible()
                .iter()
                .position(|c| c.cca3 == cca3)
        };
        if position(self).is_none() {
            self.filter = CountryFilter::default();
            self.favorites_only = false;
        }
        match position(self) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::country;

    fn loaded() -> Explorer {
        let mut explorer = Explorer::new(Some(&User::demo()));
        explorer.countries = vec![
            country("USA", "United States", "Americas", 329_484_123),
            country("FRA", "France", "Europe", 67_391_582),
            country("JPN", "Japan", "Asia", 125_836_021),
        ];
        explorer.is_loading = false;
        explorer
    }

    #[test]
    fn test_new_defaults() {
        let explorer = Explorer::new(None);
        assert!(explorer.is_loading);
        assert!(explorer.username.is_none());
        assert!(explorer.favorites.is_empty());
        assert!(explorer.selected_country().is_none());
    }

    #[test]
    fn test_favorites_snapshot_from_user() {
        let explorer = loaded();
        assert_eq!(explorer.username.as_deref(), Some("demo"));
        assert_eq!(explorer.favorites, vec!["USA", "CAN", "JPN"]);
    }

    #[test]
    fn test_favorites_only_view() {
        let mut explorer = loaded();
        explorer.favorites_only = true;
        let visible: Vec<&str> = explorer.visible().iter().map(|c| c.cca3.as_str()).collect();
        assert_eq!(visible, vec!["USA", "JPN"]);
    }

    #[test]
    fn test_clamp_selection() {
        let mut explorer = loaded();
        explorer.selected = 10;
        explorer.clamp_selection();
        assert_eq!(explorer.selected, 2);

        explorer.filter.query = "zzz".to_string();
        explorer.clamp_selection();
        assert_eq!(explorer.selected, 0);
        assert!(explorer.selected_country().is_none());
    }

    #[test]
    fn test_select_code_clears_hiding_filter() {
        let mut explorer = loaded();
        explorer.filter.region = Some("Asia".to_string());
        assert!(explorer.select_code("FRA"));
        assert!(explorer.filter.region.is_none());
        assert_eq!(explorer.selected_country().unwrap().cca3, "FRA");
        assert!(!explorer.select_code("XXX"));
    }
}
