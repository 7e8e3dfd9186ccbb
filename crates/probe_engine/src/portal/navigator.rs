//! Navigation side effect used by portals

use std::cell::RefCell;

/// Errors reported by a navigator
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The target could not be understood
    #[error("invalid navigation target '{0}'")]
    InvalidTarget(String),

    /// The host refused or failed to navigate
    #[error("navigation to '{url}' failed: {reason}")]
    Failed {
        /// Requested target
        url: String,
        /// Host-provided reason
        reason: String,
    },
}

/// Performs the (irreversible) jump to another location
///
/// Implementations decide what a URL means: a page load, a scene swap, a
/// server hand-off. Calls are never retried by the caller.
pub trait Navigator {
    /// Leave for `url`
    fn navigate(&self, url: &str) -> Result<(), NavigationError>;
}

/// Navigator that only logs and remembers where it was sent
#[derive(Debug, Default)]
pub struct LogNavigator {
    history: RefCell<Vec<String>>,
}

impl LogNavigator {
    /// Create a navigator with an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL navigated to, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Navigator for LogNavigator {
    fn navigate(&self, url: &str) -> Result<(), NavigationError> {
        if url.trim().is_empty() {
            return Err(NavigationError::InvalidTarget(url.to_string()));
        }
        log::info!("Navigating to {}", url);
        self.history.borrow_mut().push(url.to_string());
        Ok(())
    }
}
