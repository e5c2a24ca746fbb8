use std::collections::HashMap;

use thiserror::Error;

use crate::model::completion::CompletionSet;
use crate::model::ids::QuizId;
use crate::model::quiz::{ChoiceKey, QuizItem};
use crate::model::rank::{RankTier, can_access_level};

/// Shown when a submission could not reach a verdict (network or API failure).
pub const SUBMISSION_FAILED_MESSAGE: &str = "Could not submit your answer. Please try again.";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("quiz {0} is not on this board")]
    UnknownQuiz(QuizId),

    #[error("quiz {0} is already answered correctly")]
    AlreadyCompleted(QuizId),

    #[error("quiz {id} is level {level}, above what rank {rank} allows")]
    LevelLocked {
        id: QuizId,
        rank: RankTier,
        level: i32,
    },

    #[error("quiz {0} is not open")]
    NotOpen(QuizId),

    #[error("choice {choice} does not exist on quiz {id}")]
    InvalidChoice { id: QuizId, choice: u8 },
}

//
// ─── VALUES ────────────────────────────────────────────────────────────────────
//

/// Verdict returned by the service for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub is_correct: bool,
    pub message: String,
}

/// An answer ready to be sent, produced by `QuizBoard::begin_submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSubmission {
    pub quiz_id: QuizId,
    pub choice: ChoiceKey,
}

/// Lifecycle of a single quiz item on the board.
///
/// `Correct` is terminal. `Incorrect` re-opens on the next interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    Unopened,
    Open {
        selected: Option<ChoiceKey>,
        /// Generic failure text after a submission that never got a verdict.
        notice: Option<String>,
    },
    /// `message` is `None` when completion came from history rather than this view.
    Correct { message: Option<String> },
    Incorrect { selected: ChoiceKey, message: String },
}

impl AttemptState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Correct { .. })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, AttemptState::Open { .. })
    }

    #[must_use]
    pub fn selected(&self) -> Option<ChoiceKey> {
        match self {
            AttemptState::Open { selected, .. } => *selected,
            AttemptState::Incorrect { selected, .. } => Some(*selected),
            AttemptState::Unopened | AttemptState::Correct { .. } => None,
        }
    }
}

//
// ─── BOARD ─────────────────────────────────────────────────────────────────────
//

/// Per-view quiz state: the visible items, one `AttemptState` each, and the
/// user's completion set.
#[derive(Debug, Clone)]
pub struct QuizBoard {
    rank: RankTier,
    items: Vec<QuizItem>,
    states: HashMap<QuizId, AttemptState>,
    completed: CompletionSet,
}

impl QuizBoard {
    /// Items already in `completed` start out `Correct`; everything else `Unopened`.
    #[must_use]
    pub fn new(rank: RankTier, items: Vec<QuizItem>, completed: CompletionSet) -> Self {
        let states = items
            .iter()
            .map(|item| {
                let state = if completed.contains(item.id()) {
                    AttemptState::Correct { message: None }
                } else {
                    AttemptState::Unopened
                };
                (item.id(), state)
            })
            .collect();
        Self {
            rank,
            items,
            states,
            completed,
        }
    }

    #[must_use]
    pub fn rank(&self) -> RankTier {
        self.rank
    }

    #[must_use]
    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionSet {
        &self.completed
    }

    #[must_use]
    pub fn item(&self, id: QuizId) -> Option<&QuizItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn state(&self, id: QuizId) -> Option<&AttemptState> {
        self.states.get(&id)
    }

    #[must_use]
    pub fn is_complete(&self, id: QuizId) -> bool {
        self.completed.contains(id)
    }

    /// Whether a submission for `id` would be accepted at all.
    ///
    /// Independent of whether a choice is currently selected.
    #[must_use]
    pub fn can_submit(&self, id: QuizId) -> bool {
        self.item(id).is_some_and(|item| {
            !self.completed.contains(id) && can_access_level(self.rank, item.level())
        })
    }

    /// Unopened → Open. An `Incorrect` item is re-opened with its last choice.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` for unknown, completed, or level-locked items.
    pub fn open(&mut self, id: QuizId) -> Result<(), AttemptError> {
        self.ensure_attemptable(id)?;
        let state = self.state_mut(id)?;
        match state {
            AttemptState::Unopened => {
                *state = AttemptState::Open {
                    selected: None,
                    notice: None,
                };
            }
            AttemptState::Incorrect { selected, .. } => {
                let choice = *selected;
                *state = AttemptState::Open {
                    selected: Some(choice),
                    notice: None,
                };
            }
            AttemptState::Open { .. } | AttemptState::Correct { .. } => {}
        }
        Ok(())
    }

    /// Collapses an open or incorrect item back to `Unopened`. Completed items stay put.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::UnknownQuiz` if the item is not on the board.
    pub fn close(&mut self, id: QuizId) -> Result<(), AttemptError> {
        let state = self.state_mut(id)?;
        if matches!(
            state,
            AttemptState::Open { .. } | AttemptState::Incorrect { .. }
        ) {
            *state = AttemptState::Unopened;
        }
        Ok(())
    }

    /// Records the user's choice. Selecting on an `Incorrect` item re-opens it.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotOpen` for an unopened item, `InvalidChoice` when the
    /// choice is outside the item's choice set, and the `open` errors otherwise.
    pub fn select(&mut self, id: QuizId, choice: ChoiceKey) -> Result<(), AttemptError> {
        self.ensure_attemptable(id)?;
        let fits = self
            .item(id)
            .is_some_and(|item| item.choices().contains(choice));
        if !fits {
            return Err(AttemptError::InvalidChoice {
                id,
                choice: choice.value(),
            });
        }

        let state = self.state_mut(id)?;
        match state {
            AttemptState::Open { .. } | AttemptState::Incorrect { .. } => {
                *state = AttemptState::Open {
                    selected: Some(choice),
                    notice: None,
                };
                Ok(())
            }
            AttemptState::Unopened => Err(AttemptError::NotOpen(id)),
            AttemptState::Correct { .. } => Err(AttemptError::AlreadyCompleted(id)),
        }
    }

    /// Prepares a submission for `id`.
    ///
    /// Returns `Ok(None)` when no choice is selected; that is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::AlreadyCompleted` for completed items so no request is
    /// ever made for them, plus the usual unknown/locked/not-open errors.
    pub fn begin_submit(&mut self, id: QuizId) -> Result<Option<PendingSubmission>, AttemptError> {
        self.ensure_attemptable(id)?;
        let state = self.state_mut(id)?;
        let choice = match state {
            AttemptState::Open { selected, .. } => *selected,
            AttemptState::Incorrect { selected, .. } => {
                let choice = *selected;
                *state = AttemptState::Open {
                    selected: Some(choice),
                    notice: None,
                };
                Some(choice)
            }
            AttemptState::Unopened => return Err(AttemptError::NotOpen(id)),
            AttemptState::Correct { .. } => return Err(AttemptError::AlreadyCompleted(id)),
        };
        Ok(choice.map(|choice| PendingSubmission {
            quiz_id: id,
            choice,
        }))
    }

    /// Applies the service's verdict to an open item.
    ///
    /// A correct verdict adds the item to the completion set and locks it.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotOpen` unless the item is open.
    pub fn apply_verdict(
        &mut self,
        id: QuizId,
        result: &SubmissionResult,
    ) -> Result<(), AttemptError> {
        let state = self.state_mut(id)?;
        let AttemptState::Open { selected, .. } = state else {
            return Err(AttemptError::NotOpen(id));
        };

        if result.is_correct {
            *state = AttemptState::Correct {
                message: Some(result.message.clone()),
            };
            self.completed.insert(id);
            return Ok(());
        }

        let Some(choice) = *selected else {
            return Err(AttemptError::NotOpen(id));
        };
        *state = AttemptState::Incorrect {
            selected: choice,
            message: result.message.clone(),
        };
        Ok(())
    }

    /// Keeps the item open after a failed submission and attaches the generic notice.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NotOpen` unless the item is open.
    pub fn apply_failure(&mut self, id: QuizId) -> Result<(), AttemptError> {
        let state = self.state_mut(id)?;
        let AttemptState::Open { notice, .. } = state else {
            return Err(AttemptError::NotOpen(id));
        };
        *notice = Some(SUBMISSION_FAILED_MESSAGE.to_string());
        Ok(())
    }

    /// Optimistically records a completion without a history refetch.
    pub fn mark_complete(&mut self, id: QuizId) {
        self.completed.insert(id);
        if let Some(state) = self.states.get_mut(&id) {
            if !state.is_terminal() {
                *state = AttemptState::Correct { message: None };
            }
        }
    }

    fn ensure_attemptable(&self, id: QuizId) -> Result<(), AttemptError> {
        let item = self.item(id).ok_or(AttemptError::UnknownQuiz(id))?;
        if self.completed.contains(id) {
            return Err(AttemptError::AlreadyCompleted(id));
        }
        if !can_access_level(self.rank, item.level()) {
            return Err(AttemptError::LevelLocked {
                id,
                rank: self.rank,
                level: item.level(),
            });
        }
        Ok(())
    }

    fn state_mut(&mut self, id: QuizId) -> Result<&mut AttemptState, AttemptError> {
        self.states
            .get_mut(&id)
            .ok_or(AttemptError::UnknownQuiz(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quiz::{ChoiceSet, Subject};

    fn item(id: u64, level: i32) -> QuizItem {
        let choices = ChoiceSet::from_shapes(
            None,
            Some((
                ["A".into(), "B".into(), "C".into(), "D".into()],
                "2".into(),
            )),
        )
        .unwrap();
        QuizItem::new(
            QuizId::new(id),
            format!("Question {id}"),
            Subject::finance(),
            RankTier::Bronze,
            level,
            choices,
        )
        .unwrap()
    }

    fn key(value: u8) -> ChoiceKey {
        ChoiceKey::new(value).unwrap()
    }

    fn board() -> QuizBoard {
        QuizBoard::new(
            RankTier::Bronze,
            vec![item(7, 1), item(42, 1), item(99, 2)],
            CompletionSet::new(),
        )
    }

    #[test]
    fn correct_verdict_is_terminal_and_completes() {
        let mut board = board();
        let id = QuizId::new(42);
        board.open(id).unwrap();
        board.select(id, key(2)).unwrap();
        let pending = board.begin_submit(id).unwrap().unwrap();
        assert_eq!(pending.choice, key(2));

        board
            .apply_verdict(
                id,
                &SubmissionResult {
                    is_correct: true,
                    message: "정답입니다".into(),
                },
            )
            .unwrap();

        assert!(board.is_complete(id));
        assert!(!board.can_submit(id));
        assert_eq!(
            board.state(id),
            Some(&AttemptState::Correct {
                message: Some("정답입니다".into())
            })
        );
        assert_eq!(
            board.begin_submit(id),
            Err(AttemptError::AlreadyCompleted(id))
        );
        assert_eq!(board.open(id), Err(AttemptError::AlreadyCompleted(id)));
    }

    #[test]
    fn incorrect_verdict_allows_retry() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        board.select(id, key(1)).unwrap();
        board.begin_submit(id).unwrap();
        board
            .apply_verdict(
                id,
                &SubmissionResult {
                    is_correct: false,
                    message: "오답입니다".into(),
                },
            )
            .unwrap();

        assert!(!board.is_complete(id));
        assert!(board.can_submit(id));
        assert!(matches!(
            board.state(id),
            Some(AttemptState::Incorrect { .. })
        ));

        board.select(id, key(3)).unwrap();
        assert_eq!(
            board.state(id),
            Some(&AttemptState::Open {
                selected: Some(key(3)),
                notice: None
            })
        );
    }

    #[test]
    fn resubmitting_after_incorrect_reopens_with_last_choice() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        board.select(id, key(4)).unwrap();
        board.begin_submit(id).unwrap();
        board
            .apply_verdict(
                id,
                &SubmissionResult {
                    is_correct: false,
                    message: "no".into(),
                },
            )
            .unwrap();

        let pending = board.begin_submit(id).unwrap().unwrap();
        assert_eq!(pending.choice, key(4));
        assert!(board.state(id).unwrap().is_open());
    }

    #[test]
    fn submit_without_choice_is_noop() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        assert_eq!(board.begin_submit(id), Ok(None));
        assert!(board.state(id).unwrap().is_open());
    }

    #[test]
    fn failure_keeps_item_open_with_notice() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        board.select(id, key(2)).unwrap();
        board.begin_submit(id).unwrap();
        board.apply_failure(id).unwrap();

        assert_eq!(
            board.state(id),
            Some(&AttemptState::Open {
                selected: Some(key(2)),
                notice: Some(SUBMISSION_FAILED_MESSAGE.into())
            })
        );
        assert!(board.completion().is_empty());
    }

    #[test]
    fn level_above_rank_is_blocked_before_opening() {
        let mut board = board();
        let id = QuizId::new(99);
        assert!(!board.can_submit(id));
        assert_eq!(
            board.open(id),
            Err(AttemptError::LevelLocked {
                id,
                rank: RankTier::Bronze,
                level: 2
            })
        );
        assert_eq!(board.state(id), Some(&AttemptState::Unopened));
    }

    #[test]
    fn history_completion_starts_terminal() {
        let completed: CompletionSet = [QuizId::new(7)].into_iter().collect();
        let board = QuizBoard::new(RankTier::Bronze, vec![item(7, 1)], completed);
        assert_eq!(
            board.state(QuizId::new(7)),
            Some(&AttemptState::Correct { message: None })
        );
        assert!(!board.can_submit(QuizId::new(7)));
    }

    #[test]
    fn selecting_requires_open_item_and_valid_choice() {
        let mut board = board();
        let id = QuizId::new(7);
        assert_eq!(board.select(id, key(1)), Err(AttemptError::NotOpen(id)));
        assert_eq!(
            board.select(QuizId::new(5), key(1)),
            Err(AttemptError::UnknownQuiz(QuizId::new(5)))
        );
    }

    #[test]
    fn close_collapses_open_item() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        board.select(id, key(1)).unwrap();
        board.close(id).unwrap();
        assert_eq!(board.state(id), Some(&AttemptState::Unopened));
        assert_eq!(board.begin_submit(id), Err(AttemptError::NotOpen(id)));
    }

    #[test]
    fn mark_complete_locks_item() {
        let mut board = board();
        let id = QuizId::new(7);
        board.open(id).unwrap();
        board.mark_complete(id);
        assert!(board.state(id).unwrap().is_terminal());
        assert!(!board.can_submit(id));
    }
}
