use log::debug;

/// Route the UI is sent to after logout unless configured otherwise
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation performed by the hosting UI
///
/// The session core never routes by itself; it only asks the host to move to
/// a route as a side effect of logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, route: &str) {
        self(route);
    }
}

/// Navigator for hosts without routing (tests, headless tools)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        debug!("Navigation to {route} requested but no navigator is attached");
    }
}
