//! Session store: the client's record of "who is logged in".
//!
//! ARCHITECTURE
//! ============
//! The session is two values under fixed storage keys: the opaque backend
//! token and the JSON-encoded user profile. Both are written in one
//! `Storage::set_all` batch and removed in one `Storage::remove_all` batch,
//! so a reader sees either the whole session or none of it.
//!
//! The store holds no cached copy. Every query goes back to storage, which
//! keeps it correct when another process (or a second store over the same
//! file) logs in or out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{Storage, StorageError};

/// Storage key for the backend session token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the serialized user profile.
pub const USER_KEY: &str = "user";

/// Profile of the authenticated user as returned by the OAuth exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A complete session: token and profile together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Persistent session state over an injected [`Storage`].
///
/// Cloning shares the underlying storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persist token and profile in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if `token` is empty, the profile cannot be encoded,
    /// or storage rejects the write. Nothing is persisted in that case.
    pub fn save(&self, token: &str, user: &UserProfile) -> Result<(), StorageError> {
        if token.is_empty() {
            return Err(StorageError::EmptyToken);
        }
        let user_json = serde_json::to_string(user)?;
        self.storage
            .set_all(&[(TOKEN_KEY, token.to_owned()), (USER_KEY, user_json)])?;
        tracing::info!(user_id = user.id, "session saved");
        Ok(())
    }

    /// True when a non-empty token is stored. Expiry is the backend's call.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The stored token, if non-empty.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The stored profile, or `None` when absent, unreadable, or stored
    /// without a token.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.token()?;
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "stored user profile is unreadable");
                None
            }
        }
    }

    /// Token and profile together; `None` unless both are present.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.current_user()?;
        Some(Session { token, user })
    }

    /// Remove token and profile together. Safe to call when already empty.
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the removal.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_all(&[TOKEN_KEY, USER_KEY])?;
        tracing::debug!("session cleared");
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
