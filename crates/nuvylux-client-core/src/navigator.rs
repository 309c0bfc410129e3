use std::fmt::Debug;
use tracing::warn;

/// Performs a full navigation (page reload, not an in-app route change) so
/// that the front end starts again from a clean session
pub trait Navigator: Debug + Send + Sync + 'static {
    fn hard_redirect(&self, route: &str);
}

/// Used when there is no UI to navigate, only records that it was requested
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn hard_redirect(&self, route: &str) {
        warn!(route, "session ended, navigation requested");
    }
}
