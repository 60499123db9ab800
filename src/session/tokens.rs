//! Session tokens and their durable storage. Once a login succeeds the tokens
//! belong to storage; what is stored under `jwt` and `refresh` decides whether
//! the user is authenticated on the next load. Token values must never be logged.

use serde::Deserialize;
use std::{collections::HashMap, fmt, sync::Mutex};
use thiserror::Error;
use tracing::warn;

/// Storage key for the access token.
pub const JWT_KEY: &str = "jwt";
/// Storage key for the refresh token.
pub const REFRESH_KEY: &str = "refresh";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Success body of `POST /login`.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    pub jwt: String,
    pub refresh: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionTokens {
    /// Returns `None` unless both tokens are non-empty.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String) -> Option<Self> {
        if access_token.is_empty() || refresh_token.is_empty() {
            None
        } else {
            Some(Self {
                access_token,
                refresh_token,
            })
        }
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .finish()
    }
}

/// String key/value storage that survives reloads (browser `localStorage`, a
/// file on disk). Each `set_item` must be atomic for its key; `set_items` must
/// leave either every pair written or the previous values in place.
pub trait TokenStorage {
    /// # Errors
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    /// Returns `StorageError` if the value could not be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    /// Returns `StorageError` if the key could not be removed.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Writes every pair or none of them. The default writes one key at a time
    /// and restores the keys already written when a later write fails.
    ///
    /// # Errors
    /// Returns the `StorageError` of the failed write.
    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut previous = Vec::with_capacity(items.len());
        for (key, _) in items {
            previous.push((*key, self.get_item(key)?));
        }

        for (written, (key, value)) in items.iter().enumerate() {
            if let Err(err) = self.set_item(key, value) {
                for (key, old) in previous.iter().take(written) {
                    let restored = match old {
                        Some(old) => self.set_item(key, old),
                        None => self.remove_item(key),
                    };
                    if let Err(restore_err) = restored {
                        warn!(key = %key, error = %restore_err, "failed to restore storage key");
                    }
                }
                return Err(err);
            }
        }

        Ok(())
    }
}

impl<S: TokenStorage + ?Sized> TokenStorage for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        (**self).set_items(items)
    }
}

/// Writes `jwt` and `refresh` as one batch, so a failed write never pairs a
/// new token with an old one.
///
/// # Errors
/// Returns the `StorageError` of the failed write.
pub fn persist_tokens(
    storage: &impl TokenStorage,
    tokens: &SessionTokens,
) -> Result<(), StorageError> {
    storage.set_items(&[
        (JWT_KEY, tokens.access_token.as_str()),
        (REFRESH_KEY, tokens.refresh_token.as_str()),
    ])
}

/// Reads back a stored session; `None` unless both keys hold non-empty values.
///
/// # Errors
/// Returns `StorageError` if the backend cannot be read.
pub fn load_tokens(storage: &impl TokenStorage) -> Result<Option<SessionTokens>, StorageError> {
    let jwt = storage.get_item(JWT_KEY)?;
    let refresh = storage.get_item(REFRESH_KEY)?;
    Ok(jwt
        .zip(refresh)
        .and_then(|(jwt, refresh)| SessionTokens::new(jwt, refresh)))
}

/// # Errors
/// Returns `StorageError` if the backend cannot be read.
pub fn is_authenticated(storage: &impl TokenStorage) -> Result<bool, StorageError> {
    load_tokens(storage).map(|tokens| tokens.is_some())
}

/// # Errors
/// Returns the first `StorageError` encountered.
pub fn clear_tokens(storage: &impl TokenStorage) -> Result<(), StorageError> {
    storage.remove_item(JWT_KEY)?;
    storage.remove_item(REFRESH_KEY)?;
    Ok(())
}

/// Process-local storage, used by tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.items
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map(|items| items.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn set_items(&self, items: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut map = self.lock()?;
        for (key, value) in items {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}
