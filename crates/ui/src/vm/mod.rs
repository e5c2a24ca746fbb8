mod home_vm;
mod leaderboard_vm;
mod profile_vm;
mod quiz_vm;
mod signup_vm;
mod task;
mod time_fmt;

pub use home_vm::{HomeVm, RecentQuizVm, load_home};
pub use leaderboard_vm::{LeaderboardRowVm, LeaderboardVm};
pub use profile_vm::{ProfileVm, load_profile};
pub use quiz_vm::{QuizCardStatus, QuizCardVm, QuizVm, SubmitFeedback};
pub use signup_vm::{SignupStep, SignupWizard};
pub use time_fmt::{format_datetime, format_taken_at};
