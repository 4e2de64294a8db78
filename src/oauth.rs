//! Google OAuth handshake: login URL, callback exchange, logout.
//!
//! ARCHITECTURE
//! ============
//! The backend owns the provider credentials. The client only asks it for an
//! authorization URL, sends the user there, and hands the `code` + `state`
//! from the provider redirect back to the backend in exchange for a session
//! token and profile.
//!
//! TRADE-OFFS
//! ==========
//! The session is saved in one write after the whole exchange response has
//! been decoded. Dropping the exchange future part-way therefore leaves the
//! store exactly as it was. Single use of each code is the calling view's
//! job; the coordinator forwards whatever it is given.

use reqwest::Url;

use crate::api::types::ExchangeRequest;
use crate::api::{AuthBackend, ClientError};
use crate::session::{Session, SessionStore};

/// `code` and `state` from the provider redirect, both non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    code: String,
    state: String,
}

impl CallbackParams {
    /// # Errors
    ///
    /// Returns [`ClientError::MissingParameter`] if either value is empty.
    pub fn new(code: &str, state: &str) -> Result<Self, ClientError> {
        if code.is_empty() {
            return Err(ClientError::MissingParameter { name: "code" });
        }
        if state.is_empty() {
            return Err(ClientError::MissingParameter { name: "state" });
        }
        Ok(Self { code: code.to_owned(), state: state.to_owned() })
    }

    /// Extract the parameters from the redirect URL the provider sent the
    /// browser to. Accepts an absolute URL or a path with query string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingParameter`] if `code` or `state` is
    /// absent or empty.
    pub fn from_url(raw: &str) -> Result<Self, ClientError> {
        let url = Url::parse(raw)
            .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(raw)))
            .map_err(|_| ClientError::MissingParameter { name: "code" })?;

        let mut code = String::new();
        let mut state = String::new();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = value.into_owned(),
                "state" => state = value.into_owned(),
                "error" => tracing::warn!(provider_error = %value, "provider redirect carried an error"),
                _ => {}
            }
        }
        Self::new(&code, &state)
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }
}

impl From<CallbackParams> for ExchangeRequest {
    fn from(params: CallbackParams) -> Self {
        Self { code: params.code, state: params.state }
    }
}

/// Drives the OAuth handshake against an [`AuthBackend`] and records the
/// result in the [`SessionStore`].
#[derive(Debug, Clone)]
pub struct OAuthCoordinator<B> {
    backend: B,
    session: SessionStore,
}

impl<B: AuthBackend> OAuthCoordinator<B> {
    #[must_use]
    pub fn new(backend: B, session: SessionStore) -> Self {
        Self { backend, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Ask the backend for the provider authorization URL.
    ///
    /// # Errors
    ///
    /// [`ClientError::Network`] if the backend is unreachable,
    /// [`ClientError::Backend`] for a non-success status.
    pub async fn initiate_login(&self) -> Result<String, ClientError> {
        let url = self.backend.authorization_url().await?;
        tracing::info!("authorization URL issued");
        Ok(url)
    }

    /// Validate `code` and `state`, exchange them, persist the session.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingParameter`] without touching the backend when
    /// either value is empty; [`ClientError::AuthExchange`] when the backend
    /// rejects the pair; [`ClientError::Network`] when it is unreachable.
    pub async fn complete_callback(&self, code: &str, state: &str) -> Result<Session, ClientError> {
        let params = CallbackParams::new(code, state)?;
        self.exchange(params).await
    }

    /// Exchange already-validated parameters. Consumes them: the request
    /// does not outlive the attempt.
    ///
    /// # Errors
    ///
    /// Same as [`Self::complete_callback`] minus parameter validation.
    pub async fn exchange(&self, params: CallbackParams) -> Result<Session, ClientError> {
        let response = self.backend.exchange_code(params.into()).await?;
        if response.token.is_empty() {
            return Err(ClientError::Decode("exchange returned an empty token".to_owned()));
        }

        self.session.save(&response.token, &response.user)?;
        tracing::info!(user_id = response.user.id, "OAuth callback completed");
        Ok(Session { token: response.token, user: response.user })
    }

    /// Best-effort server logout, then clear the local session regardless.
    ///
    /// # Errors
    ///
    /// Only a failure to clear local storage is reported.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(token) = self.session.token() {
            if let Err(e) = self.backend.logout(&token).await {
                tracing::warn!(error = %e, "backend logout failed; clearing local session anyway");
            }
        }
        self.session.clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "oauth_test.rs"]
mod tests;
