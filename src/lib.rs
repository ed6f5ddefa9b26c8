#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Session management core for the ShopEase storefront client.
//!
//! A bearer token obtained from the remote API is persisted in a
//! [`CredentialStore`], its claims are decoded (never verified) into an
//! [`Identity`], and that identity is broadcast to every interested UI
//! observer through the [`SessionManager`] handle.
//!
//! ```rust
//! use shopease_session::{Identity, MemoryStore, SessionBuilder};
//! use std::sync::Arc;
//!
//! let session = SessionBuilder::new(Arc::new(MemoryStore::new())).initialize();
//! let navbar = session.subscribe();
//!
//! session.complete_login("header.payload.signature", Identity::new("alice", "ADMIN"));
//! assert_eq!(navbar.current(), Some(Identity::new("alice", "ADMIN")));
//!
//! navbar.logout();
//! assert!(!session.is_authenticated());
//! ```

/// Version of the session core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod claims;
pub mod identity;
pub mod session;
pub mod session_builder;
pub mod settings;
pub mod store;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use claims::{decode, Claims, ClaimsError};
pub use identity::{ClaimPolicy, Identity};
pub use session::{
    AuthResponse, IdentityObserver, Navigator, NoopNavigator, SessionManager, SessionState,
};
pub use session_builder::SessionBuilder;
pub use settings::ShopeaseSettings;
pub use store::{CredentialStore, FileStore, KeyValueStore, MemoryStore, StorageError, TOKEN_KEY};
