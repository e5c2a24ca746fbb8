use quiz_core::model::{AttemptError, SignupFormError};
use services::{ApiError, AuthError, SignupError};
use thiserror::Error;

/// What a view shows when an action cannot complete.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Please log in to continue.")]
    Unauthenticated,
    #[error("The request was cancelled.")]
    Cancelled,
    #[error("Something went wrong. Please try again.")]
    Unknown,
    #[error("{0}")]
    Rejected(String),
    #[error("Quiz data is not loaded yet.")]
    NotLoaded,
    #[error("{0}")]
    Attempt(#[from] AttemptError),
    #[error("{0}")]
    InvalidInput(String),
}

impl ViewError {
    /// True when the user should be sent back to the login screen.
    #[must_use]
    pub fn needs_login(&self) -> bool {
        matches!(self, ViewError::Unauthenticated)
    }
}

impl From<ApiError> for ViewError {
    fn from(err: ApiError) -> Self {
        if err.is_auth_failure() {
            return ViewError::Unauthenticated;
        }
        match err {
            ApiError::Rejected { message } => ViewError::Rejected(message),
            other => {
                tracing::debug!(error = %other, "view request failed");
                ViewError::Unknown
            }
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        ViewError::Rejected(err.user_message().to_string())
    }
}

impl From<SignupError> for ViewError {
    fn from(err: SignupError) -> Self {
        match err {
            SignupError::Rejected { message } | SignupError::SurveyRejected { message } => {
                ViewError::Rejected(message)
            }
            SignupError::NotAuthenticated => ViewError::Unauthenticated,
            SignupError::AutoLogin(auth) => ViewError::from(auth),
            SignupError::Api(api) => ViewError::from(api),
            other => {
                tracing::debug!(error = %other, "sign-up failed");
                ViewError::Unknown
            }
        }
    }
}

impl From<SignupFormError> for ViewError {
    fn from(err: SignupFormError) -> Self {
        ViewError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_statuses_ask_for_login() {
        assert!(ViewError::from(ApiError::Status { status: 401 }).needs_login());
        assert!(ViewError::from(ApiError::Status { status: 403 }).needs_login());
        assert_eq!(
            ViewError::from(ApiError::Status { status: 500 }),
            ViewError::Unknown
        );
    }

    #[test]
    fn service_messages_pass_through() {
        let err = ViewError::from(ApiError::Rejected {
            message: "no user".into(),
        });
        assert_eq!(err.to_string(), "no user");
    }
}
