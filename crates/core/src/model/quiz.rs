use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::rank::RankTier;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("quiz prompt cannot be empty")]
    EmptyPrompt,

    #[error("quiz must carry exactly one choice set (binary: {binary}, quaternary: {quaternary})")]
    ChoiceShape { binary: bool, quaternary: bool },

    #[error("choice {0} is out of range")]
    InvalidChoice(u8),
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// Catalog subject tag, normalised to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    /// Subjects offered by the quiz view, in display order.
    pub const KNOWN: [&'static str; 3] = ["finance", "invest", "credit"];

    /// # Errors
    ///
    /// Returns `QuizError::EmptySubject` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, QuizError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(QuizError::EmptySubject);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn finance() -> Self {
        Self(Self::KNOWN[0].to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subject {
    type Error = QuizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.0
    }
}

//
// ─── CHOICES ───────────────────────────────────────────────────────────────────
//

/// 1-based position of a choice within an item's choice set.
///
/// The service expects the answer as this number in decimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChoiceKey(u8);

impl ChoiceKey {
    /// # Errors
    ///
    /// Returns `QuizError::InvalidChoice` unless `value` is in `1..=4`.
    pub fn new(value: u8) -> Result<Self, QuizError> {
        if (1..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuizError::InvalidChoice(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn wire_value(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The answer set of a quiz item. Exactly one shape exists per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceSet {
    Binary { choices: [String; 2], correct: String },
    Quaternary { choices: [String; 4], correct: String },
}

impl ChoiceSet {
    /// Builds a choice set from the two optional shapes the catalog sends.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ChoiceShape` unless exactly one shape is present.
    pub fn from_shapes(
        binary: Option<([String; 2], String)>,
        quaternary: Option<([String; 4], String)>,
    ) -> Result<Self, QuizError> {
        match (binary, quaternary) {
            (Some((choices, correct)), None) => Ok(ChoiceSet::Binary { choices, correct }),
            (None, Some((choices, correct))) => Ok(ChoiceSet::Quaternary { choices, correct }),
            (binary, quaternary) => Err(QuizError::ChoiceShape {
                binary: binary.is_some(),
                quaternary: quaternary.is_some(),
            }),
        }
    }

    #[must_use]
    pub fn texts(&self) -> &[String] {
        match self {
            ChoiceSet::Binary { choices, .. } => choices,
            ChoiceSet::Quaternary { choices, .. } => choices,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.texts().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn contains(&self, key: ChoiceKey) -> bool {
        usize::from(key.value()) <= self.len()
    }

    /// Text of the choice at `key`, if it exists in this set.
    #[must_use]
    pub fn text(&self, key: ChoiceKey) -> Option<&str> {
        let index = usize::from(key.value()).checked_sub(1)?;
        self.texts().get(index).map(String::as_str)
    }

    /// Correct answer as published by the catalog. Grading is still done remotely.
    #[must_use]
    pub fn correct(&self) -> &str {
        match self {
            ChoiceSet::Binary { correct, .. } | ChoiceSet::Quaternary { correct, .. } => correct,
        }
    }
}

//
// ─── QUIZ ITEM ─────────────────────────────────────────────────────────────────
//

/// A single catalog question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    id: QuizId,
    prompt: String,
    subject: Subject,
    required_rank: RankTier,
    level: i32,
    choices: ChoiceSet,
}

impl QuizItem {
    /// # Errors
    ///
    /// Returns `QuizError::EmptyPrompt` if the prompt is blank.
    pub fn new(
        id: QuizId,
        prompt: impl Into<String>,
        subject: Subject,
        required_rank: RankTier,
        level: i32,
        choices: ChoiceSet,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuizError::EmptyPrompt);
        }
        Ok(Self {
            id,
            prompt,
            subject,
            required_rank,
            level,
            choices,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[must_use]
    pub fn required_rank(&self) -> RankTier {
        self.required_rank
    }

    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[must_use]
    pub fn choices(&self) -> &ChoiceSet {
        &self.choices
    }
}
