//! Route table and the login gate.
//!
//! The guard holds no state of its own. Each call to
//! [`RouteGuard::evaluate`] reads the session store afresh, so a login or a
//! 401-triggered clear is visible on the very next navigation.

use std::fmt;

use crate::session::SessionStore;

pub const LOGIN_PATH: &str = "/login";
pub const CALLBACK_PATH: &str = "/auth/google/callback";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Client-side views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    OAuthCallback,
    Dashboard,
    Course { course_id: i64 },
    Assignment { assignment_id: i64 },
    Draft { draft_id: i64 },
    NotFound(String),
}

impl Route {
    /// Resolve a path (query string ignored) to a route.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Self::Root;
        }
        let segments: Vec<&str> = trimmed.split('/').collect();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["auth", "google", "callback"] => Self::OAuthCallback,
            ["dashboard"] => Self::Dashboard,
            ["courses", id] => id
                .parse()
                .map_or_else(|_| Self::NotFound(path.to_owned()), |course_id| Self::Course { course_id }),
            ["assignments", id] => id.parse().map_or_else(
                |_| Self::NotFound(path.to_owned()),
                |assignment_id| Self::Assignment { assignment_id },
            ),
            ["drafts", id] => id
                .parse()
                .map_or_else(|_| Self::NotFound(path.to_owned()), |draft_id| Self::Draft { draft_id }),
            _ => Self::NotFound(path.to_owned()),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_owned(),
            Self::Login => LOGIN_PATH.to_owned(),
            Self::OAuthCallback => CALLBACK_PATH.to_owned(),
            Self::Dashboard => DASHBOARD_PATH.to_owned(),
            Self::Course { course_id } => format!("/courses/{course_id}"),
            Self::Assignment { assignment_id } => format!("/assignments/{assignment_id}"),
            Self::Draft { draft_id } => format!("/drafts/{draft_id}"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Views that require a session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Course { .. } | Self::Assignment { .. } | Self::Draft { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Authentication state as seen by the guard at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Anonymous,
}

/// Outcome of evaluating a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Gates protected routes on the session store.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn auth_state(&self) -> AuthState {
        if self.session.is_authenticated() { AuthState::Authenticated } else { AuthState::Anonymous }
    }

    /// Decide whether `route` renders or redirects.
    #[must_use]
    pub fn evaluate(&self, route: Route) -> Navigation {
        let state = self.auth_state();
        let navigation = decide(route, state);
        if let Navigation::Redirect(target) = &navigation {
            tracing::debug!(to = %target, ?state, "navigation redirected");
        }
        navigation
    }
}

/// Pure routing decision for a given auth state.
#[must_use]
pub fn decide(route: Route, state: AuthState) -> Navigation {
    match (route, state) {
        (Route::Root, AuthState::Authenticated) => Navigation::Redirect(Route::Dashboard),
        (Route::Root, AuthState::Anonymous) => Navigation::Redirect(Route::Login),
        (route, AuthState::Anonymous) if route.is_protected() => Navigation::Redirect(Route::Login),
        (route, _) => Navigation::Render(route),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
