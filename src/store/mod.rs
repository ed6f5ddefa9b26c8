//! Credential persistence
//!
//! The session core persists exactly one value: the bearer token issued by the
//! remote API. It lives under [`TOKEN_KEY`] in a pluggable key/value medium.
//!
//! # Modules
//!
//! - [`credential`] - Fixed-key token store used by the session manager
//! - [`memory`] - Process-local medium
//! - [`file`] - JSON file medium that survives process restarts

pub mod credential;
pub mod file;
pub mod memory;

pub use credential::{CredentialStore, TOKEN_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Failures reported by a persistence medium
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Key/value persistence medium
///
/// This is the browser-storage shaped seam the credential store sits on.
/// Implementations must be durable for as long as the hosting environment
/// considers a "reload" to preserve state.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any prior value
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`; removing a missing key succeeds
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
