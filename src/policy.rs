//! What to do when the backend says the session is gone.
//!
//! Callers invoke [`UnauthorizedPolicy::handle`] on every error from an
//! authenticated call. A 401 clears the session and sends the user to the
//! login view, unless the failing request came from the login view itself,
//! in which case the session is still cleared but no redirect is issued.

use crate::api::ClientError;
use crate::guard::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub struct UnauthorizedPolicy {
    session: SessionStore,
}

impl UnauthorizedPolicy {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Apply the policy to `error` raised while `origin` was on screen.
    ///
    /// Returns the redirect to follow, if any. Errors other than
    /// [`ClientError::Unauthorized`] leave the session untouched.
    pub fn handle(&self, error: &ClientError, origin: &Route) -> Option<Route> {
        if !matches!(error, ClientError::Unauthorized) {
            return None;
        }

        tracing::warn!(origin = %origin, "backend rejected session token; clearing session");
        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "failed to clear invalidated session");
        }

        if *origin == Route::Login { None } else { Some(Route::Login) }
    }
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
