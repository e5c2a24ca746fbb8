use quiz_core::model::{SignupForm, SurveyAnswers};

use crate::api::client::{decode, encode};
use crate::api::dto::{Envelope, SignupRequestDto, SurveyResponseDto};
use crate::api::{ApiClient, ApiRequest};
use crate::error::{ApiError, SignupError};
use crate::session_store::{LoginAck, SessionStore};

const DEFAULT_SIGNUP_FAILURE: &str = "Sign-up failed.";
const DEFAULT_SURVEY_FAILURE: &str = "Survey submission failed.";

/// Account creation followed by the onboarding survey.
#[derive(Clone)]
pub struct SignupService {
    api: ApiClient,
}

impl SignupService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Registers the account, then logs in with the same credentials so the
    /// survey can be sent with a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `SignupError::Rejected` when the service refuses the account,
    /// `SignupError::AutoLogin` when the account exists but login fails, and
    /// `SignupError::Api` when the exchange itself fails.
    pub async fn sign_up(
        &self,
        session: &mut SessionStore,
        form: &SignupForm,
    ) -> Result<LoginAck, SignupError> {
        let body = encode(&SignupRequestDto::from(form))?;
        let (status, value) = self
            .api
            .exchange_anonymous(ApiRequest::post(["users", "signup"], body))
            .await?;

        let envelope: Envelope<serde_json::Value> = match decode(value) {
            Ok(envelope) => envelope,
            Err(_) if !(200..=299).contains(&status) => {
                return Err(ApiError::Status { status }.into());
            }
            Err(err) => return Err(err.into()),
        };
        if !envelope.success {
            tracing::info!(status, "sign-up rejected");
            return Err(SignupError::Rejected {
                message: envelope
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SIGNUP_FAILURE.to_string()),
            });
        }
        tracing::info!(id = form.id(), "account created");

        session
            .login(&self.api, form.id(), form.password())
            .await
            .map_err(SignupError::AutoLogin)
    }

    /// Sends the finished survey for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `SignupError::NotAuthenticated` without a live session,
    /// `SignupError::SurveyRejected` when the service does not accept it, and
    /// `SignupError::Api` when the request fails.
    pub async fn submit_survey(
        &self,
        session: &SessionStore,
        answers: &SurveyAnswers,
    ) -> Result<(), SignupError> {
        if !session.is_authenticated() {
            return Err(SignupError::NotAuthenticated);
        }
        let body = encode(answers)?;
        let response: SurveyResponseDto = self
            .api
            .fetch(session, ApiRequest::post(["surveys"], body))
            .await?;

        if !response.accepted() {
            return Err(SignupError::SurveyRejected {
                message: response
                    .message
                    .unwrap_or_else(|| DEFAULT_SURVEY_FAILURE.to_string()),
            });
        }
        tracing::info!("survey submitted");
        Ok(())
    }
}
