use crate::session::navigate::Navigator;
use tracing::warn;

/// Full page navigation through `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, target: &str) {
        let Some(window) = web_sys::window() else {
            warn!(target, "no window to navigate");
            return;
        };
        if let Err(err) = window.location().set_href(target) {
            warn!(target, error = ?err, "navigation failed");
        }
    }
}
