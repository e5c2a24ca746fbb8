use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Credential, CredentialError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by credential stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Persisted shape of a cached credential.
///
/// Mirrors the domain `Credential` so stores can serialize it without the
/// domain type depending on serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialRecord {
    #[must_use]
    pub fn from_credential(credential: &Credential) -> Self {
        Self {
            token: credential.token().to_owned(),
            expires_at: credential.expires_at(),
        }
    }

    /// Convert the record back into a domain `Credential`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the stored token is blank.
    pub fn into_credential(self) -> Result<Credential, CredentialError> {
        Credential::new(self.token, self.expires_at)
    }
}

/// Where the session's bearer credential lives between runs.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the cached credential, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn load(&self) -> Result<Option<CredentialRecord>, StorageError>;

    /// Replace the cached credential.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the credential cannot be stored.
    async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError>;

    /// Remove the cached credential. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory credential store for tests and single-run sessions.
#[derive(Clone, Default)]
pub struct InMemoryCredentialRepository {
    slot: Arc<Mutex<Option<CredentialRecord>>>,
}

impl InMemoryCredentialRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(record: CredentialRecord) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record))),
        }
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn load(&self) -> Result<Option<CredentialRecord>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, record: &CredentialRecord) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(record.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn in_memory_store_round_trips_and_clears() {
        let repo = InMemoryCredentialRepository::new();
        assert!(repo.load().await.unwrap().is_none());

        let credential = Credential::issue("jwt", fixed_now()).unwrap();
        repo.save(&CredentialRecord::from_credential(&credential))
            .await
            .unwrap();

        let loaded = repo.load().await.unwrap().unwrap().into_credential().unwrap();
        assert_eq!(loaded, credential);

        repo.clear().await.unwrap();
        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }

    #[test]
    fn blank_record_does_not_become_a_credential() {
        let record = CredentialRecord {
            token: String::new(),
            expires_at: fixed_now(),
        };
        assert_eq!(record.into_credential(), Err(CredentialError::EmptyToken));
    }
}
