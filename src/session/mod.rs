//! Session Management Module
//!
//! Ties the credential store, claim extraction and identity broadcasting into
//! one session lifecycle.
//!
//! # Modules
//!
//! - [`manager`] - Session state machine (startup, login, logout)
//! - [`publisher`] - Identity broadcast and observer handles
//! - [`auth_results`] - Result of a successful remote login/registration
//! - [`navigation`] - Navigation seam used on logout

pub mod auth_results;
pub mod manager;
pub mod navigation;
pub mod publisher;

// Re-export commonly used items for convenience
pub use auth_results::AuthResponse;
pub use manager::{SessionManager, SessionState};
pub use navigation::{Navigator, NoopNavigator, LOGIN_ROUTE};
pub use publisher::{IdentityObserver, IdentityPublisher};
