use std::collections::HashSet;

use crate::model::ids::QuizId;

/// Quiz items the current user has answered correctly at least once.
///
/// Only grows: there is no removal API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    ids: HashSet<QuizId>,
}

impl CompletionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: QuizId) -> bool {
        self.ids.contains(&id)
    }

    /// Marks an item complete. Returns `true` if it was not already present.
    pub fn insert(&mut self, id: QuizId) -> bool {
        self.ids.insert(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = QuizId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<QuizId> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = QuizId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<QuizId> for CompletionSet {
    fn extend<T: IntoIterator<Item = QuizId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}
