use chrono::{DateTime, Utc};

use crate::model::completion::CompletionSet;
use crate::model::ids::QuizId;

/// One prior attempt from the user's result history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub result_id: u64,
    pub quiz_id: QuizId,
    pub is_correct: bool,
    pub taken_at: Option<DateTime<Utc>>,
    pub prompt: String,
    pub subject: String,
    pub level: i32,
}

/// Projects the ids of correctly answered items out of a result history.
#[must_use]
pub fn completion_from_history(results: &[QuizResult]) -> CompletionSet {
    results
        .iter()
        .filter(|result| result.is_correct)
        .map(|result| result.quiz_id)
        .collect()
}

/// Newest results first, truncated to `limit`. Undated results sort last.
#[must_use]
pub fn most_recent(results: &[QuizResult], limit: usize) -> Vec<QuizResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|left, right| right.taken_at.cmp(&left.taken_at));
    sorted.truncate(limit);
    sorted
}
