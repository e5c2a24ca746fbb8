mod attempt;
mod completion;
mod history;
mod ids;
mod leaderboard;
mod profile;
mod quiz;
mod quote;
mod rank;
mod session;
mod signup;

pub use ids::{ParseIdError, QuizId, UserId};

pub use attempt::{
    AttemptError, AttemptState, PendingSubmission, QuizBoard, SUBMISSION_FAILED_MESSAGE,
    SubmissionResult,
};
pub use completion::CompletionSet;
pub use history::{QuizResult, completion_from_history, most_recent};
pub use leaderboard::{LeaderboardEntry, LeaderboardPage};
pub use profile::{RadarAxes, STAT_SCALE_MAX, UserInfo, UserStats};
pub use quiz::{ChoiceKey, ChoiceSet, QuizError, QuizItem, Subject};
pub use quote::FINANCIAL_QUOTES;
pub use rank::{RankError, RankFilter, RankTier, can_access_level};
pub use session::{Credential, CredentialError, SESSION_TTL_MINUTES, Session, session_ttl};
pub use signup::{SignupForm, SignupFormError, SurveyAnswers, SurveyDraft, SurveyStep};
