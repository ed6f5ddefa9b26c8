//! Testing utilities for the session core
//!
//! - [`fixtures`] - Signed tokens and pre-populated stores
//! - [`mock`] - Recording navigator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopease_session::testing::fixtures::TestFixtures;
//!
//! let token = TestFixtures::token_for("alice", "ADMIN");
//! assert_eq!(token.split('.').count(), 3);
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::RecordingNavigator;

/// Common test constants
pub mod constants {
    /// HMAC key used to sign fixture tokens (256 bits)
    pub const TEST_SIGNING_KEY: &[u8] = b"test_key_32_bytes_long_for_test_";

    /// Default fixture username
    pub const TEST_USERNAME: &str = "alice";

    /// Issue time stamped into fixture tokens
    pub const TEST_ISSUED_AT: i64 = 1_700_000_000;

    /// Token lifetime used by the storefront backend (24 hours)
    pub const TEST_TOKEN_LIFETIME_SECS: i64 = 86_400;
}
