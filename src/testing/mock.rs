//! Mock collaborators

use crate::session::navigation::Navigator;
use std::sync::Mutex;

/// Navigator that records every requested route
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Routes requested so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if a previous navigation panicked while holding the lock.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("navigator lock poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .expect("navigator lock poisoned")
            .push(route.to_string());
    }
}
