//! Shared error types for the services crate.

use thiserror::Error;

/// Failure to get any response out of the transport.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("base url cannot carry path segments: {0}")]
    BaseUrl(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by `ApiClient` calls.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("could not encode request body: {0}")]
    Encode(String),
    #[error("{message}")]
    Rejected { message: String },
}

impl ApiError {
    /// True when the service refused the credential (absent, expired, or revoked).
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403 })
    }
}

/// Errors emitted by `SessionStore::login`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("login response did not include a token")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Text suitable for an inline form error.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::Rejected { message } => message,
            AuthError::MissingToken | AuthError::Api(_) => "An error occurred while logging in.",
        }
    }
}

/// Errors emitted by `SignupService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignupError {
    #[error("{message}")]
    Rejected { message: String },
    #[error("account created but automatic login failed: {0}")]
    AutoLogin(#[source] AuthError),
    #[error("survey was not accepted: {message}")]
    SurveyRejected { message: String },
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors raised while reading client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base url: {raw}")]
    InvalidBaseUrl { raw: String },
    #[error("invalid request timeout (seconds): {raw}")]
    InvalidTimeout { raw: String },
    #[error("invalid catalog rank filter: {raw}")]
    InvalidRankFilter { raw: String },
}

/// Errors emitted while bootstrapping client services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientServicesError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
