use std::sync::Arc;

use quiz_core::model::RankFilter;
use services::{
    AnswerService, ApiClient, ClientServices, CompletionTracker, LeaderboardService,
    ProfileService, QuizCatalog, SessionStore, SignupService,
};

use crate::views::ViewError;

pub trait UiApp: Send + Sync {
    fn api(&self) -> ApiClient;
    fn catalog(&self) -> Arc<QuizCatalog>;
    fn completion(&self) -> Arc<CompletionTracker>;
    fn answers(&self) -> Arc<AnswerService>;
    fn profile(&self) -> Arc<ProfileService>;
    fn leaderboard(&self) -> Arc<LeaderboardService>;
    fn signup(&self) -> Arc<SignupService>;
}

impl UiApp for ClientServices {
    fn api(&self) -> ApiClient {
        ClientServices::api(self).clone()
    }

    fn catalog(&self) -> Arc<QuizCatalog> {
        ClientServices::catalog(self)
    }

    fn completion(&self) -> Arc<CompletionTracker> {
        ClientServices::completion(self)
    }

    fn answers(&self) -> Arc<AnswerService> {
        ClientServices::answers(self)
    }

    fn profile(&self) -> Arc<ProfileService> {
        ClientServices::profile(self)
    }

    fn leaderboard(&self) -> Arc<LeaderboardService> {
        ClientServices::leaderboard(self)
    }

    fn signup(&self) -> Arc<SignupService> {
        ClientServices::signup(self)
    }
}

/// Everything the views need: the services and the one session they share.
///
/// The session lives here rather than in any global; views borrow it per call.
pub struct AppContext {
    api: ApiClient,
    catalog: Arc<QuizCatalog>,
    completion: Arc<CompletionTracker>,
    answers: Arc<AnswerService>,
    profile: Arc<ProfileService>,
    leaderboard: Arc<LeaderboardService>,
    signup: Arc<SignupService>,
    session: SessionStore,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, session: SessionStore) -> Self {
        Self {
            api: app.api(),
            catalog: app.catalog(),
            completion: app.completion(),
            answers: app.answers(),
            profile: app.profile(),
            leaderboard: app.leaderboard(),
            signup: app.signup(),
            session,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn rank_filter(&self) -> RankFilter {
        self.catalog.filter()
    }

    /// # Errors
    ///
    /// Returns `ViewError::Rejected` with a displayable message when login fails.
    pub async fn login(&mut self, id: &str, password: &str) -> Result<Option<String>, ViewError> {
        let ack = self.session.login(&self.api, id, password).await?;
        Ok(ack.message)
    }

    pub async fn logout(&mut self) {
        self.session.logout().await;
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

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>, session: SessionStore) -> AppContext {
    AppContext::new(app, session)
}
