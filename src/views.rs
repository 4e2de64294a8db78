//! View boundary for the login and OAuth callback screens.
//!
//! Every failure here is recovered: the user gets a short status line and is
//! moved on to another view after a fixed delay. The callback view issues
//! its redirect only once the exchange has resolved, so the guard check that
//! follows sees the final session state.

use std::time::Duration;

use crate::api::{AuthBackend, ClientError};
use crate::guard::Route;
use crate::oauth::{CallbackParams, OAuthCoordinator};

pub const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const FAILURE_REDIRECT_DELAY: Duration = Duration::from_millis(3000);

pub const LOGIN_FAILED: &str = "Failed to initiate login. Please try again.";
pub const CALLBACK_MISSING_PARAMS: &str = "Error: Missing authentication parameters";
pub const CALLBACK_FAILED: &str = "Authentication failed. Redirecting to login...";
pub const CALLBACK_SUCCEEDED: &str = "Login successful! Redirecting to dashboard...";

/// Status to show, and where to go after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOutcome {
    pub status: String,
    pub next: Route,
    pub delay: Duration,
}

impl ViewOutcome {
    fn new(status: &str, next: Route, delay: Duration) -> Self {
        Self { status: status.to_owned(), next, delay }
    }
}

/// Result of pressing "Login with Google".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginView {
    /// Send the browser to the provider.
    OpenProvider { authorization_url: String },
    /// Stay on the login view with an error line.
    Failed { status: String, cause: ClientError },
}

pub async fn login_view<B: AuthBackend>(coordinator: &OAuthCoordinator<B>) -> LoginView {
    match coordinator.initiate_login().await {
        Ok(authorization_url) => LoginView::OpenProvider { authorization_url },
        Err(cause) => {
            tracing::error!(error = %cause, "login initiation failed");
            LoginView::Failed { status: LOGIN_FAILED.to_owned(), cause }
        }
    }
}

/// Process one provider redirect. Call exactly once per redirect received.
pub async fn callback_view<B: AuthBackend>(coordinator: &OAuthCoordinator<B>, redirect_url: &str) -> ViewOutcome {
    match CallbackParams::from_url(redirect_url) {
        Ok(params) => finish_callback(coordinator, params).await,
        Err(e) => {
            tracing::warn!(error = %e, "malformed OAuth callback");
            ViewOutcome::new(CALLBACK_MISSING_PARAMS, Route::Login, FAILURE_REDIRECT_DELAY)
        }
    }
}

/// Like [`callback_view`] for parameters already split out of the redirect.
pub async fn callback_view_with<B: AuthBackend>(
    coordinator: &OAuthCoordinator<B>,
    code: &str,
    state: &str,
) -> ViewOutcome {
    match CallbackParams::new(code, state) {
        Ok(params) => finish_callback(coordinator, params).await,
        Err(e) => {
            tracing::warn!(error = %e, "malformed OAuth callback");
            ViewOutcome::new(CALLBACK_MISSING_PARAMS, Route::Login, FAILURE_REDIRECT_DELAY)
        }
    }
}

async fn finish_callback<B: AuthBackend>(coordinator: &OAuthCoordinator<B>, params: CallbackParams) -> ViewOutcome {
    match coordinator.exchange(params).await {
        Ok(_) => ViewOutcome::new(CALLBACK_SUCCEEDED, Route::Dashboard, SUCCESS_REDIRECT_DELAY),
        Err(e) => {
            tracing::error!(error = %e, "authentication failed");
            ViewOutcome::new(CALLBACK_FAILED, Route::Login, FAILURE_REDIRECT_DELAY)
        }
    }
}

#[cfg(test)]
#[path = "views_test.rs"]
mod tests;
