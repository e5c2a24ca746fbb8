use std::sync::Arc;

use quiz_core::model::RankFilter;

use crate::answer_service::AnswerService;
use crate::api::{ApiClient, HttpTransport, Transport};
use crate::catalog_service::QuizCatalog;
use crate::completion_service::CompletionTracker;
use crate::config::ClientConfig;
use crate::error::ClientServicesError;
use crate::leaderboard_service::LeaderboardService;
use crate::profile_service::ProfileService;
use crate::signup_service::SignupService;

/// Assembles the client-facing services around one shared `ApiClient`.
#[derive(Clone)]
pub struct ClientServices {
    api: ApiClient,
    catalog: Arc<QuizCatalog>,
    completion: Arc<CompletionTracker>,
    answers: Arc<AnswerService>,
    profile: Arc<ProfileService>,
    leaderboard: Arc<LeaderboardService>,
    signup: Arc<SignupService>,
}

impl ClientServices {
    /// Build services talking HTTP to the configured base url.
    ///
    /// # Errors
    ///
    /// Returns `ClientServicesError` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientServicesError> {
        let transport = HttpTransport::new(config.base_url.clone(), config.timeout)?;
        tracing::debug!(base_url = %config.base_url, filter = config.rank_filter.as_str(), "client services ready");
        Ok(Self::with_transport(Arc::new(transport), config.rank_filter))
    }

    /// Build services over any transport, e.g. a scripted one in tests.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, rank_filter: RankFilter) -> Self {
        let api = ApiClient::new(transport);
        Self {
            catalog: Arc::new(QuizCatalog::new(api.clone(), rank_filter)),
            completion: Arc::new(CompletionTracker::new(api.clone())),
            answers: Arc::new(AnswerService::new(api.clone())),
            profile: Arc::new(ProfileService::new(api.clone())),
            leaderboard: Arc::new(LeaderboardService::new(api.clone())),
            signup: Arc::new(SignupService::new(api.clone())),
            api,
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuizCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn completion(&self) -> Arc<CompletionTracker> {
        Arc::clone(&self.completion)
    }

    #[must_use]
    pub fn answers(&self) -> Arc<AnswerService> {
        Arc::clone(&self.answers)
    }

    #[must_use]
    pub fn profile(&self) -> Arc<ProfileService> {
        Arc::clone(&self.profile)
    }

    #[must_use]
    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard)
    }

    #[must_use]
    pub fn signup(&self) -> Arc<SignupService> {
        Arc::clone(&self.signup)
    }
}
