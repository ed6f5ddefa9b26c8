//! Session Manager - Token-Backed Identity Lifecycle
//!
//! The `SessionManager` is the single owner of the session state machine:
//!
//! - **Anonymous**: no identity is published
//! - **Authenticated**: an identity derived from (or supplied with) the stored
//!   token is published
//!
//! Startup resolution happens once, in
//! [`SessionBuilder::initialize`](crate::session_builder::SessionBuilder::initialize).
//! After that only [`SessionManager::complete_login`] (and its variants) and
//! [`SessionManager::logout`] move the state. Both touch nothing but the
//! credential store and the identity publisher, plus the navigation request on
//! logout. Network calls happen before `complete_login` is invoked and are not
//! this type's concern.

use super::auth_results::AuthResponse;
use super::navigation::Navigator;
use super::publisher::{IdentityObserver, IdentityPublisher};
use crate::claims;
use crate::identity::{ClaimPolicy, Identity};
use crate::store::CredentialStore;
use crate::utils::logging::LoggingHelper;
use std::sync::Arc;

/// Observable state of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<Identity>> for SessionState {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// Session handle passed down to the UI layer
///
/// Cloning is cheap; all clones drive the same store and publisher.
#[derive(Clone)]
pub struct SessionManager {
    store: CredentialStore,
    publisher: IdentityPublisher,
    navigator: Arc<dyn Navigator>,
    claim_policy: ClaimPolicy,
    login_route: Arc<str>,
}

// =============================================================================
// Construction
// =============================================================================

impl SessionManager {
    /// Build a manager and resolve the startup identity from the stored token
    pub(crate) fn initialize(
        store: CredentialStore,
        navigator: Arc<dyn Navigator>,
        claim_policy: ClaimPolicy,
        login_route: &str,
    ) -> Self {
        let manager = Self {
            store,
            publisher: IdentityPublisher::new(None),
            navigator,
            claim_policy,
            login_route: Arc::from(login_route),
        };
        manager.restore_from_store();
        manager
    }

    fn restore_from_store(&self) {
        let token = self.store.get();
        match self.identity_for_token(token.as_deref()) {
            Some(identity) => {
                LoggingHelper::log_session_restored(&identity);
                self.publisher.publish(Some(identity));
            }
            None => LoggingHelper::log_session_anonymous(token.is_some()),
        }
    }

    fn identity_for_token(&self, token: Option<&str>) -> Option<Identity> {
        let claims = claims::decode(token)?;
        Identity::from_claims(&claims, self.claim_policy)
            .map_err(|e| LoggingHelper::log_rejected_claims(&e))
            .ok()
    }
}

// =============================================================================
// State Access
// =============================================================================

impl SessionManager {
    /// Currently published identity
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.publisher.current()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.identity().into()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Register a new observer of the identity
    #[must_use]
    pub fn subscribe(&self) -> IdentityObserver {
        IdentityObserver::new(self.publisher.subscribe(), self.clone())
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.publisher.observer_count()
    }

    #[must_use]
    pub fn claim_policy(&self) -> ClaimPolicy {
        self.claim_policy
    }

    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    /// Token currently held by the credential store
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.store.get()
    }
}

// =============================================================================
// Transitions
// =============================================================================

impl SessionManager {
    /// Record a successful remote authentication
    ///
    /// Persists `token` (replacing any previous one) and publishes `identity`.
    pub fn complete_login(&self, token: &str, identity: Identity) {
        self.store.save(token);
        LoggingHelper::log_login_completed(&identity, token.len());
        self.publisher.publish(Some(identity));
    }

    /// Record a successful remote authentication that only returned a token
    ///
    /// The identity is projected from the token's own claims. A token that does
    /// not yield an identity is not kept, and the session ends up anonymous.
    pub fn complete_login_with_token(&self, token: &str) -> SessionState {
        if let Some(identity) = self.identity_for_token(Some(token)) {
            self.complete_login(token, identity.clone());
            SessionState::Authenticated(identity)
        } else {
            LoggingHelper::log_login_token_unusable(token.len());
            self.store.remove();
            self.publisher.publish(None);
            SessionState::Anonymous
        }
    }

    /// Record a successful login or registration response
    ///
    /// Identity fields in the response take precedence; otherwise the identity
    /// comes from the token.
    pub fn complete_auth_response(&self, response: &AuthResponse) -> SessionState {
        match response.supplied_identity() {
            Some(identity) => {
                self.complete_login(&response.token, identity.clone());
                SessionState::Authenticated(identity)
            }
            None => self.complete_login_with_token(&response.token),
        }
    }

    /// End the session from any state
    ///
    /// Removes the stored token, publishes "no identity" and asks the host to
    /// navigate to the login route.
    pub fn logout(&self) {
        self.store.remove();
        let was_authenticated = self.publisher.publish(None);
        LoggingHelper::log_logout(was_authenticated, &self.login_route);
        self.navigator.navigate(&self.login_route);
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("identity", &self.identity())
            .field("claim_policy", &self.claim_policy)
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
