// Centralized logging for session transitions. Tokens are never logged, only
// their length.
use crate::claims::ClaimsError;
use crate::identity::Identity;
use crate::store::StorageError;
use log::{debug, error, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log a session restored from the stored token at startup
    pub fn log_session_restored(identity: &Identity) {
        info!(
            "Restored session for user: {} (role: {})",
            identity.username, identity.role
        );
    }

    /// Log a startup that ended anonymous
    pub fn log_session_anonymous(token_present: bool) {
        if token_present {
            info!("Stored token could not be decoded; starting anonymous");
        } else {
            debug!("No stored token; starting anonymous");
        }
    }

    /// Log claims that decoded but did not satisfy the claim policy
    pub fn log_rejected_claims(err: &ClaimsError) {
        warn!("Token claims rejected: {err}");
    }

    /// Log a completed login
    pub fn log_login_completed(identity: &Identity, token_len: usize) {
        info!(
            "Login completed for user: {} (role: {}, token: {} bytes)",
            identity.username, identity.role, token_len
        );
    }

    /// Log a login whose token did not yield an identity
    pub fn log_login_token_unusable(token_len: usize) {
        warn!("Login token ({token_len} bytes) did not yield an identity; session cleared");
    }

    /// Log a logout and the navigation it triggers
    pub fn log_logout(was_authenticated: bool, route: &str) {
        if was_authenticated {
            info!("User logged out; navigating to {route}");
        } else {
            debug!("Logout requested while anonymous; navigating to {route}");
        }
    }

    /// Log a persistence medium failure swallowed by the credential store
    pub fn log_storage_failure(operation: &str, err: &StorageError) {
        error!("Credential store {operation} failed: {err}");
    }
}
