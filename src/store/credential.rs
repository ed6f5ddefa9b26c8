use super::{KeyValueStore, StorageError};
use crate::utils::logging::LoggingHelper;
use std::sync::Arc;

/// Key under which the bearer token is persisted. No other key is touched.
pub const TOKEN_KEY: &str = "shopease_token";

/// Single-slot token store
///
/// Medium failures are not surfaced: they are logged, reads degrade to "no
/// token" and writes are dropped.
#[derive(Clone)]
pub struct CredentialStore {
    medium: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self { medium }
    }

    /// Persist `token`, overwriting any previous one
    pub fn save(&self, token: &str) {
        if let Err(e) = self.medium.set(TOKEN_KEY, token) {
            LoggingHelper::log_storage_failure("save", &e);
        }
    }

    /// Read the stored token, if any
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.medium
            .get(TOKEN_KEY)
            .unwrap_or_else(|e: StorageError| {
                LoggingHelper::log_storage_failure("get", &e);
                None
            })
    }

    /// Remove the stored token; no-op if nothing is stored
    pub fn remove(&self) {
        if let Err(e) = self.medium.remove(TOKEN_KEY) {
            LoggingHelper::log_storage_failure("remove", &e);
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("key", &TOKEN_KEY)
            .finish_non_exhaustive()
    }
}
