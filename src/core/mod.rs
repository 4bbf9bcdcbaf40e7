//! # Core Application Logic
//!
//! Atlas's business logic. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session store        │
//!                    │  • Catalog filters      │
//!                    │  • Explorer reducer     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    CLI     │      │  Storage   │
//!     │  Adapter   │      │  Adapter   │      │  (file /   │
//!     │ (ratatui)  │      │  (clap)    │      │   memory)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: `SessionStore`, the logged-in user and their favorites
//! - [`storage`]: the `Storage` trait and its file/memory backends
//! - [`catalog`]: client-side filtering and favorite resolution
//! - [`debounce`]: timer-cancellation coalescing for type-ahead
//! - [`state`]: the `Explorer` struct, all explorer state in one place
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`config`]: `~/.atlas/config.toml` loading and resolution

pub mod action;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod session;
pub mod state;
pub mod storage;
