use crate::session::navigate::Navigator;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};
use url::Url;

/// Terminal stand-in for a browser redirect: resolves the target against the
/// application URL and remembers it for the caller to report.
#[derive(Debug)]
pub struct ConsoleNavigator {
    app_url: Url,
    last: Mutex<Option<String>>,
}

impl ConsoleNavigator {
    #[must_use]
    pub fn new(app_url: Url) -> Self {
        Self {
            app_url,
            last: Mutex::new(None),
        }
    }

    /// The most recent resolved target, if any navigation happened.
    #[must_use]
    pub fn last_target(&self) -> Option<String> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, target: &str) {
        let resolved = match self.app_url.join(target) {
            Ok(url) => url.to_string(),
            Err(err) => {
                warn!(target, error = %err, "redirect target is not a valid URL reference");
                target.to_string()
            }
        };
        info!(to = %resolved, "redirecting");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(resolved);
    }
}
