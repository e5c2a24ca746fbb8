use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

/// Lifetime of a cached bearer token after login.
pub const SESSION_TTL_MINUTES: i64 = 30;

#[must_use]
pub fn session_ttl() -> Duration {
    Duration::minutes(SESSION_TTL_MINUTES)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialError {
    #[error("bearer token cannot be empty")]
    EmptyToken,
}

/// A bearer token with its client-side expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    /// # Errors
    ///
    /// Returns `CredentialError::EmptyToken` for a blank token.
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>) -> Result<Self, CredentialError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        Ok(Self { token, expires_at })
    }

    /// Issues a credential that expires `SESSION_TTL_MINUTES` after `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::EmptyToken` for a blank token.
    pub fn issue(token: impl Into<String>, issued_at: DateTime<Utc>) -> Result<Self, CredentialError> {
        Self::new(token, issued_at + session_ttl())
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The client's authentication state: at most one credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }

    /// Replaces any existing credential with a freshly issued one.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::EmptyToken` for a blank token.
    pub fn create(&mut self, token: impl Into<String>, now: DateTime<Utc>) -> Result<&Credential, CredentialError> {
        let credential = Credential::issue(token, now)?;
        Ok(self.credential.insert(credential))
    }

    pub fn clear(&mut self) {
        self.credential = None;
    }

    /// The credential, unless it has expired by `now`.
    #[must_use]
    pub fn credential_at(&self, now: DateTime<Utc>) -> Option<&Credential> {
        self.credential
            .as_ref()
            .filter(|credential| !credential.is_expired(now))
    }

    #[must_use]
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.credential_at(now).is_some()
    }
}
