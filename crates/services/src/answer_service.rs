use quiz_core::model::{
    AttemptError, ChoiceKey, QuizBoard, QuizId, SUBMISSION_FAILED_MESSAGE, SubmissionResult,
};

use crate::api::dto::VerdictDto;
use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::session_store::SessionStore;

/// How one press of "submit" ended.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// No choice was selected, so nothing was sent.
    NothingSelected,
    /// The service graded the answer.
    Verdict(SubmissionResult),
    /// The answer never got graded; the item stays open for another try.
    Failed { message: String, error: ApiError },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, SubmissionOutcome::Verdict(result) if result.is_correct)
    }
}

/// Sends selected answers to the service for grading.
#[derive(Clone)]
pub struct AnswerService {
    api: ApiClient,
}

impl AnswerService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Asks the service whether `choice` is the right answer to `quiz_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the service cannot be reached or does not answer
    /// with a verdict.
    pub async fn check_answer(
        &self,
        session: &SessionStore,
        quiz_id: QuizId,
        choice: ChoiceKey,
    ) -> Result<SubmissionResult, ApiError> {
        let request = ApiRequest::get([
            "quiz".to_string(),
            "iscorrect".to_string(),
            quiz_id.to_string(),
            choice.wire_value(),
        ]);
        let verdict: VerdictDto = self.api.fetch(session, request).await?;
        Ok(SubmissionResult {
            is_correct: verdict.is_correct,
            message: verdict.message,
        })
    }

    /// Submits the selected answer of `quiz_id` and records the outcome on `board`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` without contacting the service when the item is
    /// unknown, already completed, or locked for the board's rank.
    pub async fn submit(
        &self,
        session: &SessionStore,
        board: &mut QuizBoard,
        quiz_id: QuizId,
    ) -> Result<SubmissionOutcome, AttemptError> {
        let Some(pending) = board.begin_submit(quiz_id)? else {
            return Ok(SubmissionOutcome::NothingSelected);
        };

        match self.check_answer(session, pending.quiz_id, pending.choice).await {
            Ok(result) => {
                tracing::info!(quiz_id = %pending.quiz_id, correct = result.is_correct, "answer graded");
                board.apply_verdict(pending.quiz_id, &result)?;
                Ok(SubmissionOutcome::Verdict(result))
            }
            Err(error) => {
                tracing::warn!(quiz_id = %pending.quiz_id, error = %error, "answer submission failed");
                board.apply_failure(pending.quiz_id)?;
                Ok(SubmissionOutcome::Failed {
                    message: SUBMISSION_FAILED_MESSAGE.to_string(),
                    error,
                })
            }
        }
    }
}
