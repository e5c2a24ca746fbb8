use quiz_core::model::{QuizItem, RankFilter, RankTier, Subject};
use serde_json::Value;

use crate::api::dto::QuizItemDto;
use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::session_store::SessionStore;

/// Loads the quizzes offered for a subject at the user's rank.
#[derive(Clone)]
pub struct QuizCatalog {
    api: ApiClient,
    filter: RankFilter,
}

impl QuizCatalog {
    #[must_use]
    pub fn new(api: ApiClient, filter: RankFilter) -> Self {
        Self { api, filter }
    }

    #[must_use]
    pub fn filter(&self) -> RankFilter {
        self.filter
    }

    /// Fetches `subject` quizzes for `rank`, keeping only items the filter admits.
    ///
    /// Entries the service sends in an unusable shape are skipped and logged.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the body is not a list.
    pub async fn list_quizzes(
        &self,
        session: &SessionStore,
        subject: &Subject,
        rank: RankTier,
    ) -> Result<Vec<QuizItem>, ApiError> {
        let request = ApiRequest::get(["quiz", "generation", subject.as_str(), rank.as_str()]);
        let raw: Vec<Value> = self.api.fetch(session, request).await?;
        let fetched = raw.len();

        let items: Vec<QuizItem> = raw
            .into_iter()
            .filter_map(|value| {
                let parsed = serde_json::from_value::<QuizItemDto>(value)
                    .map_err(|err| err.to_string())
                    .and_then(|dto| QuizItem::try_from(dto).map_err(|err| err.to_string()));
                match parsed {
                    Ok(item) => Some(item),
                    Err(reason) => {
                        tracing::warn!(%subject, %reason, "skipping malformed quiz item");
                        None
                    }
                }
            })
            .filter(|item| self.filter.admits(rank, item.required_rank()))
            .collect();

        tracing::debug!(%subject, %rank, fetched, kept = items.len(), filter = self.filter.as_str(), "quiz catalog loaded");
        Ok(items)
    }
}
