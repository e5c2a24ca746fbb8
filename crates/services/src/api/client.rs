use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::transport::{ApiRequest, Transport};
use crate::error::ApiError;
use crate::session_store::SessionStore;

/// Single point through which every service call reaches the quiz service.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends `request` with the session's bearer token when one is live.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for any status outside 200..=299,
    /// `ApiError::Transport` when no response arrives, and `ApiError::Decode`
    /// when the body is not JSON.
    pub async fn call(&self, session: &SessionStore, request: ApiRequest) -> Result<Value, ApiError> {
        let request = match session.bearer() {
            Some(token) => request.with_bearer(token),
            None => request,
        };
        self.execute(request).await
    }

    /// Sends `request` without credentials (login, signup).
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`].
    pub async fn call_anonymous(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.execute(request).await
    }

    /// Anonymous exchange whose JSON body is returned whatever the status.
    ///
    /// Used where the service explains refusals in the body of an error status.
    /// A non-JSON body on a failed status still yields `ApiError::Status`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` when no response arrives and
    /// `ApiError::Decode` when a successful response is not JSON.
    pub async fn exchange_anonymous(&self, request: ApiRequest) -> Result<(u16, Value), ApiError> {
        let method = request.method.clone();
        let path = request.path();
        tracing::debug!(%method, %path, "api request");

        let response = self.transport.send(request).await?;
        tracing::debug!(%method, %path, status = response.status, "api response");
        match serde_json::from_str(&response.body) {
            Ok(body) => Ok((response.status, body)),
            Err(_) if !response.is_success() => Err(ApiError::Status {
                status: response.status,
            }),
            Err(err) => Err(ApiError::Decode(err.to_string())),
        }
    }

    /// [`ApiClient::call`] followed by decoding into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`], plus `ApiError::Decode` on a shape mismatch.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        session: &SessionStore,
        request: ApiRequest,
    ) -> Result<T, ApiError> {
        let value = self.call(session, request).await?;
        decode(value)
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = request.method.clone();
        let path = request.path();
        tracing::debug!(%method, %path, authenticated = request.bearer.is_some(), "api request");

        let response = self.transport.send(request).await.map_err(|err| {
            tracing::warn!(%method, %path, error = %err, "api transport failure");
            ApiError::from(err)
        })?;

        if !response.is_success() {
            tracing::warn!(%method, %path, status = response.status, "api request rejected");
            return Err(ApiError::Status {
                status: response.status,
            });
        }
        tracing::debug!(%method, %path, status = response.status, "api response");

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Decode an already-fetched body into a wire type.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Encode a wire type as a request body.
pub(crate) fn encode<T: Serialize>(body: &T) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|err| ApiError::Encode(err.to_string()))
}
