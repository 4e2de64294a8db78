//! Client error taxonomy.

/// Errors produced by backend calls and the OAuth flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The provider redirect lacked `code` or `state`.
    #[error("missing {name} parameter in OAuth callback")]
    MissingParameter { name: &'static str },

    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("backend error: status {status}")]
    Backend { status: u16, body: String },

    /// The backend rejected the code/state pair.
    #[error("OAuth code exchange rejected: status {status}")]
    AuthExchange { status: u16, body: String },

    /// The backend reported the session token invalid (HTTP 401).
    #[error("session is no longer valid")]
    Unauthorized,

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The session could not be written to or removed from storage.
    #[error("session storage failed: {0}")]
    Storage(String),
}

impl From<crate::storage::StorageError> for ClientError {
    fn from(e: crate::storage::StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

impl ClientError {
    /// Stable machine-readable code for logs and `--json` output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. } => "E_MISSING_PARAMETER",
            Self::Network(_) => "E_NETWORK",
            Self::Backend { .. } => "E_BACKEND",
            Self::AuthExchange { .. } => "E_AUTH_EXCHANGE",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Storage(_) => "E_STORAGE",
        }
    }

    /// Whether repeating the same request could plausibly succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Backend { status: 429 | 500..=599, .. })
    }
}
