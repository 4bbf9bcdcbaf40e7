//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: top status line (user, region filter, status)
//! - `CountryDetail`: facts for the selected country
//! - `SuggestionList`: type-ahead matches under the search box
//!
//! ### Stateful Components
//!
//! - `SearchBox`: owns the query buffer, emits `SearchEvent`s
//! - `CountryList`: borrows a `ListState` from `TuiState` for selection/scroll
//!
//! Components receive external data as props rather than reading `Explorer`
//! directly, so each one can be rendered against a `TestBackend` in isolation.

pub mod country_detail;
pub mod country_list;
pub mod search_box;
pub mod suggestion_list;
pub mod title_bar;

pub use country_detail::CountryDetail;
pub use country_list::CountryList;
pub use search_box::{SearchBox, SearchEvent};
pub use suggestion_list::SuggestionList;
pub use title_bar::TitleBar;
