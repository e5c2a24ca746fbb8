use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Credential, Session};
use storage::{CredentialRecord, CredentialRepository};

use crate::api::dto::{Envelope, LoginRequestDto};
use crate::api::client::{decode, encode};
use crate::api::{ApiClient, ApiRequest};
use crate::error::{ApiError, AuthError};

const DEFAULT_LOGIN_FAILURE: &str = "Login failed.";

/// What a successful login reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAck {
    pub message: Option<String>,
}

/// Owns the user's credential for the lifetime of the client.
///
/// Expiry is always judged against the injected `Clock`, so a credential past
/// its thirty minutes is treated as absent even before anything clears it.
pub struct SessionStore {
    clock: Clock,
    credentials: Arc<dyn CredentialRepository>,
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub fn new(clock: Clock, credentials: Arc<dyn CredentialRepository>) -> Self {
        Self {
            clock,
            credentials,
            session: Session::anonymous(),
        }
    }

    /// Builds a store from whatever credential the repository still holds.
    ///
    /// Unreadable or expired credentials leave the store anonymous.
    pub async fn restore(clock: Clock, credentials: Arc<dyn CredentialRepository>) -> Self {
        let mut store = Self::new(clock, credentials);
        let record = match store.credentials.load().await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "could not read cached credential");
                None
            }
        };

        let Some(record) = record else {
            return store;
        };
        match record.into_credential() {
            Ok(credential) if !credential.is_expired(store.clock.now()) => {
                tracing::debug!(expires_at = %credential.expires_at(), "restored cached credential");
                store.session = Session::from_credential(credential);
            }
            Ok(_) => {
                tracing::debug!("cached credential has expired");
                store.forget_persisted().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding invalid cached credential");
                store.forget_persisted().await;
            }
        }
        store
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Moves a fixed clock forward; a no-op for the system clock.
    pub fn advance_clock(&mut self, delta: chrono::Duration) {
        self.clock.advance(delta);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated(self.clock.now())
    }

    /// The live credential, or `None` when absent or expired.
    #[must_use]
    pub fn current_credential(&self) -> Option<&Credential> {
        self.session.credential_at(self.clock.now())
    }

    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.current_credential().map(Credential::token)
    }

    /// Exchanges an id and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` when the service refuses the credentials,
    /// `AuthError::MissingToken` when it accepts them without a token, and
    /// `AuthError::Api` when the exchange itself fails.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        id: &str,
        password: &str,
    ) -> Result<LoginAck, AuthError> {
        let body = encode(&LoginRequestDto { id, password })?;
        let (status, value) = api
            .exchange_anonymous(ApiRequest::post(["users", "login"], body))
            .await?;

        let envelope: Envelope<String> = match decode(value) {
            Ok(envelope) => envelope,
            Err(_) if !(200..=299).contains(&status) => {
                return Err(ApiError::Status { status }.into());
            }
            Err(err) => return Err(err.into()),
        };

        if !envelope.success {
            tracing::info!(status, "login rejected");
            return Err(AuthError::Rejected {
                message: envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string()),
            });
        }

        let token = envelope
            .data
            .filter(|token| !token.trim().is_empty())
            .ok_or(AuthError::MissingToken)?;
        let now = self.clock.now();
        let credential = self
            .session
            .create(token, now)
            .map_err(|_| AuthError::MissingToken)?
            .clone();
        tracing::info!(expires_at = %credential.expires_at(), "logged in");

        if let Err(err) = self
            .credentials
            .save(&CredentialRecord::from_credential(&credential))
            .await
        {
            tracing::warn!(error = %err, "could not persist credential");
        }

        Ok(LoginAck {
            message: envelope.message,
        })
    }

    /// Drops the credential. Never fails; storage problems are only logged.
    pub async fn logout(&mut self) {
        self.session.clear();
        self.forget_persisted().await;
        tracing::info!("logged out");
    }

    async fn forget_persisted(&self) {
        if let Err(err) = self.credentials.clear().await {
            tracing::warn!(error = %err, "could not remove cached credential");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::InMemoryCredentialRepository;

    #[tokio::test]
    async fn restore_keeps_live_credential() {
        let credential = Credential::issue("jwt", fixed_now()).unwrap();
        let repo = InMemoryCredentialRepository::with_record(CredentialRecord::from_credential(
            &credential,
        ));
        let store = SessionStore::restore(fixed_clock(), Arc::new(repo)).await;
        assert!(store.is_authenticated());
        assert_eq!(store.bearer(), Some("jwt"));
    }

    #[tokio::test]
    async fn restore_drops_expired_credential() {
        let credential = Credential::issue("jwt", fixed_now()).unwrap();
        let repo = InMemoryCredentialRepository::with_record(CredentialRecord::from_credential(
            &credential,
        ));
        let clock = fixed_clock().advanced(chrono::Duration::minutes(31));
        let store = SessionStore::restore(clock, Arc::new(repo.clone())).await;
        assert!(!store.is_authenticated());
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn credential_expires_with_the_clock() {
        let credential = Credential::issue("jwt", fixed_now()).unwrap();
        let repo = InMemoryCredentialRepository::with_record(CredentialRecord::from_credential(
            &credential,
        ));
        let mut store = SessionStore::restore(fixed_clock(), Arc::new(repo)).await;

        store.advance_clock(chrono::Duration::minutes(29));
        assert!(store.is_authenticated());
        store.advance_clock(chrono::Duration::minutes(1));
        assert!(!store.is_authenticated());
        assert!(store.current_credential().is_none());
    }
}
