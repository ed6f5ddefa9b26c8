//! Identity broadcast
//!
//! A single `watch` slot holds the current identity. Observers read that slot
//! directly instead of keeping their own copy, so every observer sees the same
//! value and a transition made through any handle is visible to all of them on
//! their next read.

use super::manager::SessionManager;
use crate::identity::Identity;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct IdentityPublisher {
    sender: Arc<watch::Sender<Option<Identity>>>,
}

impl IdentityPublisher {
    #[must_use]
    pub fn new(initial: Option<Identity>) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the current identity; returns whether it changed
    ///
    /// Observers are only woken when the value actually differs.
    pub fn publish(&self, identity: Option<Identity>) -> bool {
        self.sender.send_if_modified(move |current| {
            if *current == identity {
                return false;
            }
            *current = identity;
            true
        })
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.sender.subscribe()
    }

    /// Number of live observers
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Handle given to UI consumers
///
/// Exposes the shared identity and the logout transition, nothing else.
#[derive(Clone)]
pub struct IdentityObserver {
    receiver: watch::Receiver<Option<Identity>>,
    session: SessionManager,
}

impl IdentityObserver {
    pub(crate) fn new(receiver: watch::Receiver<Option<Identity>>, session: SessionManager) -> Self {
        Self { receiver, session }
    }

    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.receiver.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.receiver.borrow().is_some()
    }

    /// Log out the whole session, not just this observer
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Wait for the next identity transition and return the new value
    pub async fn changed(&mut self) -> Option<Identity> {
        // The observer holds a session clone, which keeps the sender alive.
        if self.receiver.changed().await.is_err() {
            return self.current();
        }
        self.receiver.borrow_and_update().clone()
    }
}

impl std::fmt::Debug for IdentityObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityObserver")
            .field("current", &*self.receiver.borrow())
            .finish_non_exhaustive()
    }
}
