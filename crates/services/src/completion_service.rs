use quiz_core::model::{CompletionSet, QuizResult, completion_from_history, most_recent};

use crate::api::dto::QuizResultDto;
use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::session_store::SessionStore;

/// Number of entries the home screen lists under recent quizzes.
pub const RECENT_RESULTS_LIMIT: usize = 3;

/// Reads the user's answer history to work out what is already done.
#[derive(Clone)]
pub struct CompletionTracker {
    api: ApiClient,
}

impl CompletionTracker {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Every recorded attempt, in the order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the body is malformed.
    pub async fn history(&self, session: &SessionStore) -> Result<Vec<QuizResult>, ApiError> {
        let rows: Vec<QuizResultDto> = self
            .api
            .fetch(session, ApiRequest::get(["quiz", "checkResult"]))
            .await?;
        Ok(rows.into_iter().map(QuizResult::from).collect())
    }

    /// Ids of every quiz answered correctly at least once.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the history cannot be read.
    pub async fn load_completion(&self, session: &SessionStore) -> Result<CompletionSet, ApiError> {
        let history = self.history(session).await?;
        let completed = completion_from_history(&history);
        tracing::debug!(attempts = history.len(), completed = completed.len(), "completion loaded");
        Ok(completed)
    }

    /// The newest `limit` attempts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the history cannot be read.
    pub async fn recent_results(
        &self,
        session: &SessionStore,
        limit: usize,
    ) -> Result<Vec<QuizResult>, ApiError> {
        let history = self.history(session).await?;
        Ok(most_recent(&history, limit))
    }
}
