//! Session initialization
//!
//! [`SessionBuilder::initialize`] is the one explicit startup step: it wires
//! the persistence medium, navigator and claim policy together and resolves
//! the startup identity from whatever token is already stored.

use crate::identity::ClaimPolicy;
use crate::session::navigation::{Navigator, NoopNavigator, LOGIN_ROUTE};
use crate::session::SessionManager;
use crate::settings::ShopeaseSettings;
use crate::store::{CredentialStore, KeyValueStore};
use std::sync::Arc;

pub struct SessionBuilder {
    medium: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    claim_policy: ClaimPolicy,
    login_route: String,
}

impl SessionBuilder {
    /// Start from a persistence medium with default policy and no navigator
    #[must_use]
    pub fn new(medium: Arc<dyn KeyValueStore>) -> Self {
        Self {
            medium,
            navigator: Arc::new(NoopNavigator),
            claim_policy: ClaimPolicy::default(),
            login_route: LOGIN_ROUTE.to_string(),
        }
    }

    /// Start from loaded settings (medium, claim policy and login route)
    #[must_use]
    pub fn from_settings(settings: &ShopeaseSettings) -> Self {
        Self::new(settings.storage.build_store())
            .with_claim_policy(settings.session.claim_policy)
            .with_login_route(&settings.session.login_route)
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    #[must_use]
    pub fn with_claim_policy(mut self, claim_policy: ClaimPolicy) -> Self {
        self.claim_policy = claim_policy;
        self
    }

    #[must_use]
    pub fn with_login_route(mut self, route: &str) -> Self {
        self.login_route = route.to_string();
        self
    }

    /// Build the session and resolve its startup state
    ///
    /// Runs exactly once per manager; the stored token is read here and never
    /// again until the next initialization.
    #[must_use]
    pub fn initialize(self) -> SessionManager {
        SessionManager::initialize(
            CredentialStore::new(self.medium),
            self.navigator,
            self.claim_policy,
            &self.login_route,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::store::{MemoryStore, TOKEN_KEY};
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::RecordingNavigator;

    #[test]
    fn test_defaults() {
        let manager = SessionBuilder::new(Arc::new(MemoryStore::new())).initialize();

        assert_eq!(manager.claim_policy(), ClaimPolicy::Lenient);
        assert_eq!(manager.login_route(), LOGIN_ROUTE);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_custom_login_route_is_used_on_logout() {
        let navigator = Arc::new(RecordingNavigator::default());
        let manager = SessionBuilder::new(Arc::new(MemoryStore::new()))
            .with_navigator(navigator.clone())
            .with_login_route("/connexion")
            .initialize();

        manager.logout();
        assert_eq!(navigator.routes(), vec!["/connexion".to_string()]);
    }

    #[test]
    fn test_closure_navigator() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let sink = seen.clone();
        let manager = SessionBuilder::new(Arc::new(MemoryStore::new()))
            .with_navigator(Arc::new(move |route: &str| {
                *sink.lock().unwrap() = Some(route.to_string());
            }))
            .initialize();

        manager.logout();
        assert_eq!(seen.lock().unwrap().as_deref(), Some(LOGIN_ROUTE));
    }

    #[test]
    fn test_each_initialize_rereads_the_store() {
        let medium = Arc::new(MemoryStore::new());
        let first = SessionBuilder::new(medium.clone()).initialize();
        first.complete_login(
            &TestFixtures::token_for("gina", "CLIENT"),
            Identity::new("gina", "CLIENT"),
        );

        let reloaded = SessionBuilder::new(medium.clone()).initialize();
        assert_eq!(reloaded.identity(), Some(Identity::new("gina", "CLIENT")));

        medium.remove(TOKEN_KEY).unwrap();
        // Already-initialized sessions do not re-read the store
        assert!(reloaded.is_authenticated());
    }
}
