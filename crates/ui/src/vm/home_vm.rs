use std::sync::Arc;

use quiz_core::model::{FINANCIAL_QUOTES, QuizResult, RankTier};
use rand::rng;
use rand::seq::IndexedRandom;
use services::{CompletionTracker, ProfileService, RECENT_RESULTS_LIMIT, SessionStore};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::task::until_cancelled;
use crate::vm::time_fmt::format_taken_at;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentQuizVm {
    pub prompt: String,
    pub subject: String,
    pub is_correct: bool,
    pub taken_at_str: String,
}

impl From<&QuizResult> for RecentQuizVm {
    fn from(result: &QuizResult) -> Self {
        Self {
            prompt: result.prompt.clone(),
            subject: result.subject.clone(),
            is_correct: result.is_correct,
            taken_at_str: format_taken_at(result.taken_at),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HomeVm {
    pub display_name: String,
    pub rank: RankTier,
    pub character_image: Option<String>,
    pub recent: Vec<RecentQuizVm>,
    /// Saying of the day, drawn at random on each load.
    pub quote: &'static str,
}

/// Loads the signed-in landing page.
///
/// # Errors
///
/// Returns `ViewError::Unauthenticated` without a live session and
/// `ViewError::Cancelled` when `cancel` fires first.
pub async fn load_home(
    ctx: &AppContext,
    cancel: &CancellationToken,
) -> Result<HomeVm, ViewError> {
    let session = ctx.session();
    if !session.is_authenticated() {
        return Err(ViewError::Unauthenticated);
    }
    let profile: Arc<ProfileService> = ctx.profile();
    let completion: Arc<CompletionTracker> = ctx.completion();

    until_cancelled(cancel, fetch_home(&profile, &completion, session)).await?
}

async fn fetch_home(
    profile: &ProfileService,
    completion: &CompletionTracker,
    session: &SessionStore,
) -> Result<HomeVm, ViewError> {
    let info = profile.user_info(session).await?;
    // A missing character image is not fatal.
    let character_image = match profile.character_image(session).await {
        Ok(image) => image,
        Err(err) => {
            tracing::debug!(error = %err, "character image unavailable");
            None
        }
    };
    let recent = completion
        .recent_results(session, RECENT_RESULTS_LIMIT)
        .await?;

    Ok(HomeVm {
        display_name: info.display_name().to_string(),
        rank: info.rank,
        character_image,
        recent: recent.iter().map(RecentQuizVm::from).collect(),
        quote: pick_quote(),
    })
}

fn pick_quote() -> &'static str {
    FINANCIAL_QUOTES.choose(&mut rng()).copied().unwrap_or_default()
}
