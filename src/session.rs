//! Auth Session
//!
//! The logged-in user and bearer token, mirrored to browser storage so a
//! reload keeps the user signed in. One `Session` is created at startup and
//! handed to the API client and the auth store.

#[cfg(test)]
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AuthResponse, User};

/// Raw bearer token
pub const TOKEN_KEY: &str = "token";
/// Serialized [`StoredSession`]
pub const SESSION_KEY: &str = "auth_session";

/// String key/value persistence (`localStorage` in the browser)
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`. Storage failures (private mode, quota) are logged
/// and otherwise ignored.
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::local() {
            if storage.set_item(key, value).is_err() {
                log::warn!("localStorage write failed for {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-process storage, shared between clones
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryStorage(Arc<Mutex<HashMap<String, String>>>);

#[cfg(test)]
impl MemoryStorage {
    fn map(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map().remove(key);
    }
}

/// Persisted session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user: User,
    pub token: String,
    pub expires_at: String,
}

impl StoredSession {
    /// Unparseable expiry timestamps are treated as not expired; the backend
    /// still rejects a dead token with 401.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        parse_timestamp(&self.expires_at).is_some_and(|at| at <= now)
    }
}

/// RFC 3339, or a naive ISO timestamp taken as UTC
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Shared handle; clones see the same state
#[derive(Clone)]
pub struct Session {
    storage: Arc<dyn SessionStorage>,
    current: Arc<Mutex<Option<StoredSession>>>,
}

impl Session {
    /// Restore from storage. Corrupt or expired records are wiped.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        Self::load_at(storage, Utc::now())
    }

    pub fn load_at(storage: Arc<dyn SessionStorage>, now: DateTime<Utc>) -> Self {
        let stored = storage
            .get(SESSION_KEY)
            .and_then(|raw| match serde_json::from_str::<StoredSession>(&raw) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    log::warn!("discarding unreadable stored session: {}", e);
                    None
                }
            });

        let current = match stored {
            Some(stored) if stored.is_expired(now) => {
                log::info!("stored session expired at {}", stored.expires_at);
                None
            }
            other => other,
        };

        let session = Self {
            storage,
            current: Arc::new(Mutex::new(None)),
        };
        match current {
            Some(stored) => *session.lock() = Some(stored),
            None => session.wipe_storage(),
        }
        session
    }

    fn lock(&self) -> MutexGuard<'_, Option<StoredSession>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wipe_storage(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(SESSION_KEY);
    }

    pub fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    #[cfg(test)]
    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().map(|s| s.user.clone())
    }

    #[cfg(test)]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Adopt a fresh login/signup result and persist it
    pub fn establish(&self, auth: &AuthResponse) {
        let stored = StoredSession {
            user: auth.user.clone(),
            token: auth.token.clone(),
            expires_at: auth.expires_at.clone(),
        };
        self.persist(&stored);
        *self.lock() = Some(stored);
    }

    /// Replace the cached user after `/auth/me`
    pub fn update_user(&self, user: User) {
        let updated = {
            let mut current = self.lock();
            let Some(stored) = current.as_mut() else {
                return;
            };
            stored.user = user;
            stored.clone()
        };
        self.persist(&updated);
    }

    pub fn clear(&self) {
        *self.lock() = None;
        self.wipe_storage();
    }

    fn persist(&self, stored: &StoredSession) {
        self.storage.set(TOKEN_KEY, &stored.token);
        match serde_json::to_string(stored) {
            Ok(json) => self.storage.set(SESSION_KEY, &json),
            Err(e) => log::error!("failed to serialize session: {}", e),
        }
    }
}
