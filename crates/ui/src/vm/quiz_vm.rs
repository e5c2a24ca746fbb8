use std::sync::Arc;

use quiz_core::model::{
    AttemptState, ChoiceKey, QuizBoard, QuizId, QuizItem, RankTier, Subject, can_access_level,
};
use services::{
    AnswerService, CompletionTracker, ProfileService, QuizCatalog, SessionStore,
    SubmissionOutcome,
};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::task::until_cancelled;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizCardStatus {
    Collapsed,
    Open,
    Correct,
    Incorrect,
    /// The user's rank is too low for the item's level.
    Locked,
}

/// One quiz card as the quiz screen shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub id: QuizId,
    pub prompt: String,
    pub level: i32,
    pub choices: Vec<String>,
    pub status: QuizCardStatus,
    pub selected: Option<u8>,
    /// Verdict text, or the failure notice after a submission that did not go through.
    pub message: Option<String>,
    pub can_submit: bool,
}

impl QuizCardVm {
    fn build(item: &QuizItem, state: Option<&AttemptState>, rank: RankTier, can_submit: bool) -> Self {
        let locked = !can_access_level(rank, item.level());
        let (status, selected, message) = match state {
            _ if locked => (QuizCardStatus::Locked, None, None),
            Some(AttemptState::Open { selected, notice }) => (
                QuizCardStatus::Open,
                selected.map(ChoiceKey::value),
                notice.clone(),
            ),
            Some(AttemptState::Correct { message }) => {
                (QuizCardStatus::Correct, None, message.clone())
            }
            Some(AttemptState::Incorrect { selected, message }) => (
                QuizCardStatus::Incorrect,
                Some(selected.value()),
                Some(message.clone()),
            ),
            Some(AttemptState::Unopened) | None => (QuizCardStatus::Collapsed, None, None),
        };

        Self {
            id: item.id(),
            prompt: item.prompt().to_string(),
            level: item.level(),
            choices: item.choices().texts().to_vec(),
            status,
            selected,
            message,
            can_submit,
        }
    }
}

/// What the user sees right after pressing submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitFeedback {
    NothingSelected,
    Correct(String),
    Incorrect(String),
    Failed(String),
}

/// Quiz screen state for one subject.
///
/// Owns a cancellation token tied to its lifetime: dropping the view model
/// (or calling [`QuizVm::cancel`]) abandons any request still in flight.
pub struct QuizVm {
    catalog: Arc<QuizCatalog>,
    completion: Arc<CompletionTracker>,
    profile: Arc<ProfileService>,
    answers: Arc<AnswerService>,
    cancel: CancellationToken,
    subject: Option<Subject>,
    board: Option<QuizBoard>,
}

impl QuizVm {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            catalog: ctx.catalog(),
            completion: ctx.completion(),
            profile: ctx.profile(),
            answers: ctx.answers(),
            cancel: CancellationToken::new(),
            subject: None,
            board: None,
        }
    }

    /// A token that fires when this view goes away.
    #[must_use]
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    #[must_use]
    pub fn rank(&self) -> Option<RankTier> {
        self.board.as_ref().map(QuizBoard::rank)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.board.is_some()
    }

    /// Fetches the user's rank, the catalog for `subject` at that rank, and the
    /// completion history, then rebuilds the board. The previous board is kept
    /// when any step fails.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unauthenticated` without a live session (no request is
    /// made), `ViewError::Cancelled` when the view is torn down mid-load, and
    /// the mapped service error otherwise.
    pub async fn load(&mut self, session: &SessionStore, subject: Subject) -> Result<(), ViewError> {
        if !session.is_authenticated() {
            return Err(ViewError::Unauthenticated);
        }
        let (catalog, completion, profile) = (
            Arc::clone(&self.catalog),
            Arc::clone(&self.completion),
            Arc::clone(&self.profile),
        );

        let board = until_cancelled(&self.cancel, async {
            let rank = profile.user_rank(session).await?;
            let items = catalog.list_quizzes(session, &subject, rank).await?;
            let completed = completion.load_completion(session).await?;
            Ok::<_, ViewError>(QuizBoard::new(rank, items, completed))
        })
        .await??;

        tracing::debug!(%subject, rank = %board.rank(), items = board.items().len(), "quiz board loaded");
        self.subject = Some(subject);
        self.board = Some(board);
        Ok(())
    }

    #[must_use]
    pub fn cards(&self) -> Vec<QuizCardVm> {
        let Some(board) = &self.board else {
            return Vec::new();
        };
        board
            .items()
            .iter()
            .map(|item| {
                QuizCardVm::build(
                    item,
                    board.state(item.id()),
                    board.rank(),
                    board.can_submit(item.id()),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn card(&self, id: QuizId) -> Option<QuizCardVm> {
        self.cards().into_iter().find(|card| card.id == id)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Attempt` for unknown, completed, or locked items.
    pub fn open(&mut self, id: QuizId) -> Result<(), ViewError> {
        self.board_mut()?.open(id)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ViewError::Attempt` for unknown items.
    pub fn close(&mut self, id: QuizId) -> Result<(), ViewError> {
        self.board_mut()?.close(id)?;
        Ok(())
    }

    /// Records choice number `choice` (1-based) for `id`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Attempt` when the choice does not exist on the item
    /// or the item cannot be attempted.
    pub fn select(&mut self, id: QuizId, choice: u8) -> Result<(), ViewError> {
        let key = ChoiceKey::new(choice).map_err(|err| ViewError::InvalidInput(err.to_string()))?;
        self.board_mut()?.select(id, key)?;
        Ok(())
    }

    /// Submits the selected answer for `id`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Unauthenticated` without a live session (no request
    /// is made) or when the service refuses the credential, in which case the
    /// item stays open. Returns `ViewError::Attempt` when the item cannot be
    /// submitted (no request is made) and `ViewError::Cancelled` when the view
    /// is torn down before the verdict arrives.
    pub async fn submit(&mut self, session: &SessionStore, id: QuizId) -> Result<SubmitFeedback, ViewError> {
        if !session.is_authenticated() {
            return Err(ViewError::Unauthenticated);
        }
        let answers = Arc::clone(&self.answers);
        let cancel = self.cancel.clone();
        let board = self.board_mut()?;

        let outcome = until_cancelled(&cancel, answers.submit(session, board, id)).await??;
        Ok(match outcome {
            SubmissionOutcome::NothingSelected => SubmitFeedback::NothingSelected,
            SubmissionOutcome::Verdict(result) if result.is_correct => {
                SubmitFeedback::Correct(result.message)
            }
            SubmissionOutcome::Verdict(result) => SubmitFeedback::Incorrect(result.message),
            SubmissionOutcome::Failed { error, .. } if error.is_auth_failure() => {
                return Err(ViewError::Unauthenticated);
            }
            SubmissionOutcome::Failed { message, .. } => SubmitFeedback::Failed(message),
        })
    }

    fn board_mut(&mut self) -> Result<&mut QuizBoard, ViewError> {
        self.board.as_mut().ok_or(ViewError::NotLoaded)
    }
}

impl Drop for QuizVm {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
