//! # Session Store
//!
//! Single source of truth for "who is logged in and what do they favorite".
//!
//! ```text
//!                 login ok                 favorite add/remove/toggle
//!   Anonymous ─────────────▶ Authenticated ◀──────────┐
//!       ▲                        │   └────────────────┘
//!       └──────── logout ────────┘
//! ```
//!
//! Reads (`is_authenticated`, `current_user`) are synchronous against memory.
//! Mutations write through to [`Storage`] first and only then update memory, so a
//! failed write leaves the in-memory state untouched.
//!
//! Two storage entries back the session: `authToken` (opaque string) and `user`
//! (JSON). A session is restored only when both are present and the user parses.
//!
//! Authentication is a stand-in: one fixed credential pair is accepted.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::storage::{Storage, StorageError};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "password";

pub const DEFAULT_LOGIN_LATENCY: Duration = Duration::from_millis(500);

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum AuthError {
    /// Username/password pair not recognized.
    InvalidCredentials,
    /// A favorite mutation was attempted with nobody logged in.
    NotAuthenticated,
    /// Durable storage rejected a write. In-memory state is unchanged.
    Storage(StorageError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::Storage(e) => write!(f, "failed to persist session: {e}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<StorageError> for AuthError {
    fn from(e: StorageError) -> Self {
        AuthError::Storage(e)
    }
}

// ============================================================================
// User
// ============================================================================

/// Normalizes a country code for use as a favorite key: trimmed, upper-case.
pub fn canonical_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Insertion-ordered set of favorite country codes (cca3).
///
/// Serialized as a plain JSON array. Duplicates in stored data are dropped on load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Favorites(Vec<String>);

impl Favorites {
    pub fn contains(&self, code: &str) -> bool {
        let code = canonical_code(code);
        self.0.contains(&code)
    }

    /// Returns false if the code was already present.
    pub fn insert(&mut self, code: &str) -> bool {
        let code = canonical_code(code);
        if code.is_empty() || self.0.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    /// Returns false if the code was not present.
    pub fn remove(&mut self, code: &str) -> bool {
        let code = canonical_code(code);
        let before = self.0.len();
        self.0.retain(|c| *c != code);
        self.0.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Favorites {
    fn from(codes: Vec<String>) -> Self {
        let mut favorites = Favorites::default();
        for code in &codes {
            favorites.insert(code);
        }
        favorites
    }
}

impl From<Favorites> for Vec<String> {
    fn from(favorites: Favorites) -> Self {
        favorites.0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub favorite_countries: Favorites,
}

impl User {
    /// The account handed out by a successful demo login.
    pub fn demo() -> Self {
        Self {
            id: "1".to_string(),
            username: DEMO_USERNAME.to_string(),
            email: "demo@example.com".to_string(),
            favorite_countries: Favorites::from(vec![
                "USA".to_string(),
                "CAN".to_string(),
                "JPN".to_string(),
            ]),
        }
    }
}

/// Generates an opaque session token.
fn new_token() -> String {
    format!(
        "mock-token-{}-{}",
        Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    )
}

// ============================================================================
// Store
// ============================================================================

/// Token and user live in one variant, so one can never exist without the other.
#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Anonymous,
    Authenticated { token: String, user: User },
}

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: RwLock<SessionState>,
    login_latency: Duration,
}

impl SessionStore {
    /// Creates an anonymous store. Call [`init_auth`](Self::init_auth) to restore a
    /// persisted session.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::Anonymous),
            login_latency: DEFAULT_LOGIN_LATENCY,
        }
    }

    /// Simulated round-trip time for `login`, so loading states are observable.
    pub fn with_login_latency(mut self, latency: Duration) -> Self {
        self.login_latency = latency;
        self
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Restores a session from storage. Missing or malformed data leaves the store
    /// anonymous. Returns whether a session was restored.
    pub fn init_auth(&self) -> bool {
        let restored = match self.read_persisted() {
            Ok(Some((token, user))) => {
                info!("Restored session for '{}'", user.username);
                SessionState::Authenticated { token, user }
            }
            Ok(None) => {
                debug!("No persisted session");
                SessionState::Anonymous
            }
            Err(reason) => {
                warn!("Ignoring persisted session: {}", reason);
                SessionState::Anonymous
            }
        };
        let authenticated = matches!(restored, SessionState::Authenticated { .. });
        *self.write_state() = restored;
        authenticated
    }

    fn read_persisted(&self) -> Result<Option<(String, User)>, String> {
        let token = self.storage.get(TOKEN_KEY).map_err(|e| e.to_string())?;
        let user_json = self.storage.get(USER_KEY).map_err(|e| e.to_string())?;
        let (Some(token), Some(user_json)) = (token, user_json) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }
        let user: User =
            serde_json::from_str(&user_json).map_err(|e| format!("malformed user record: {e}"))?;
        Ok(Some((token, user)))
    }

    fn write_user(&self, user: &User) -> Result<(), AuthError> {
        let user_json = serde_json::to_string(user)
            .map_err(|e| StorageError::Corrupt(format!("cannot serialize user: {e}")))?;
        self.storage.set(USER_KEY, &user_json)?;
        Ok(())
    }

    /// Writes user first, token second: an interrupted write never leaves a token
    /// without a user behind it. If the token write fails, the user entry is put
    /// back the way it was.
    fn persist(&self, token: &str, user: &User) -> Result<(), AuthError> {
        // An unreadable previous entry is treated as absent; the write replaces it
        let previous_user = self.storage.get(USER_KEY).ok().flatten();
        self.write_user(user)?;
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            let rollback = match &previous_user {
                Some(json) => self.storage.set(USER_KEY, json),
                None => self.storage.remove(USER_KEY),
            };
            if let Err(rollback_err) = rollback {
                warn!("Failed to roll back user entry: {}", rollback_err);
            }
            return Err(e.into());
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.read_state(), SessionState::Authenticated { .. })
    }

    pub fn current_user(&self) -> Option<User> {
        match &*self.read_state() {
            SessionState::Authenticated { user, .. } => Some(user.clone()),
            SessionState::Anonymous => None,
        }
    }

    /// Whether the current user has `code` favorited. False when anonymous.
    pub fn is_favorite(&self, code: &str) -> bool {
        match &*self.read_state() {
            SessionState::Authenticated { user, .. } => user.favorite_countries.contains(code),
            SessionState::Anonymous => false,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        tokio::time::sleep(self.login_latency).await;

        if username != DEMO_USERNAME || password != DEMO_PASSWORD {
            warn!("Rejected login for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let user = User::demo();
        let token = new_token();

        // Taken after the sleep: no await may happen while the guard is held
        let mut state = self.write_state();
        self.persist(&token, &user)?;
        *state = SessionState::Authenticated {
            token,
            user: user.clone(),
        };
        info!("Logged in as '{}'", user.username);
        Ok(user)
    }

    /// Clears the session. Safe to call when already logged out.
    pub fn logout(&self) {
        let mut state = self.write_state();
        // Token first: a half-finished logout must not restore on next start.
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }
        if matches!(*state, SessionState::Authenticated { .. }) {
            info!("Logged out");
        }
        *state = SessionState::Anonymous;
    }

    pub async fn add_favorite_country(&self, code: &str) -> Result<User, AuthError> {
        self.mutate_favorites(|favorites| {
            favorites.insert(code);
        })
    }

    pub async fn remove_favorite_country(&self, code: &str) -> Result<User, AuthError> {
        self.mutate_favorites(|favorites| {
            favorites.remove(code);
        })
    }

    /// Favorites `code` if absent, unfavorites it if present.
    pub async fn toggle_favorite(&self, code: &str) -> Result<User, AuthError> {
        self.mutate_favorites(|favorites| {
            if !favorites.remove(code) {
                favorites.insert(code);
            }
        })
    }

    /// Applies `change` to a copy of the current user's favorites, persists it,
    /// then swaps it into memory. The write lock is held throughout so concurrent
    /// mutations in this process apply one at a time.
    fn mutate_favorites<F>(&self, change: F) -> Result<User, AuthError>
    where
        F: FnOnce(&mut Favorites),
    {
        let mut state = self.write_state();
        let SessionState::Authenticated { token, user } = &*state else {
            return Err(AuthError::NotAuthenticated);
        };

        let mut updated = user.clone();
        change(&mut updated.favorite_countries);
        if updated == *user {
            return Ok(updated);
        }

        // The token is unchanged, so one atomic write of the user entry suffices
        self.write_user(&updated)?;
        let token = token.clone();
        debug!(
            "Favorites for '{}' now {:?}",
            updated.username,
            updated.favorite_countries.as_slice()
        );
        *state = SessionState::Authenticated {
            token,
            user: updated.clone(),
        };
        Ok(updated)
    }
}
