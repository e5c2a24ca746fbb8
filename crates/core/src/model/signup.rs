use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

//
// ─── BASIC INFO ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SignupFormError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("age must be between 1 and 150")]
    InvalidAge,
}

/// Account details collected on the first signup step.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupForm {
    id: String,
    password: String,
    nickname: String,
    name: String,
    gender: String,
    age: u32,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns `SignupFormError::MissingField` for blank required fields and
    /// `SignupFormError::InvalidAge` when age is 0 or unrealistically large.
    pub fn new(
        id: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
        name: impl Into<String>,
        gender: impl Into<String>,
        age: u32,
    ) -> Result<Self, SignupFormError> {
        let form = Self {
            id: id.into().trim().to_string(),
            password: password.into(),
            nickname: nickname.into().trim().to_string(),
            name: name.into().trim().to_string(),
            gender: gender.into().trim().to_string(),
            age,
        };

        for (field, value) in [
            ("id", &form.id),
            ("password", &form.password),
            ("nickname", &form.nickname),
            ("name", &form.name),
        ] {
            if value.trim().is_empty() {
                return Err(SignupFormError::MissingField { field });
            }
        }
        if !(1..=150).contains(&form.age) {
            return Err(SignupFormError::InvalidAge);
        }

        Ok(form)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .field("nickname", &self.nickname)
            .field("name", &self.name)
            .field("gender", &self.gender)
            .field("age", &self.age)
            .finish()
    }
}

//
// ─── SURVEY ────────────────────────────────────────────────────────────────────
//

/// Final survey payload, in the service's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswers {
    pub asset_type: i32,
    pub invest_resource: i32,
    pub credit_score: i32,
    pub delinquent_count: i32,
    pub debt_ratio: i32,
    pub consumption_score: i32,
    pub digital_friendly: i32,
    pub fin_know_score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyStep {
    /// Assets and credit profile.
    Assets,
    /// Spending habit questions.
    Consumption,
    /// Financial knowledge questions.
    Knowledge,
}

impl SurveyStep {
    #[must_use]
    pub fn progress_percent(self) -> u8 {
        match self {
            SurveyStep::Assets => 33,
            SurveyStep::Consumption => 66,
            SurveyStep::Knowledge => 100,
        }
    }
}

/// Survey being filled in over three steps.
///
/// The consumption score is the sum of the spending-habit answers and is fixed
/// when leaving that step; the knowledge score is summed on `finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDraft {
    step: SurveyStep,
    answers: SurveyAnswers,
    consumption: BTreeMap<String, i32>,
    knowledge: BTreeMap<String, i32>,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyDraft {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: SurveyStep::Assets,
            answers: SurveyAnswers::default(),
            consumption: BTreeMap::new(),
            knowledge: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn step(&self) -> SurveyStep {
        self.step
    }

    /// Mutable access to the numeric profile fields of the first step.
    pub fn profile_mut(&mut self) -> &mut SurveyAnswers {
        &mut self.answers
    }

    /// Records a spending-habit answer; re-answering a question replaces it.
    pub fn answer_consumption(&mut self, question_id: impl Into<String>, value: i32) {
        self.consumption.insert(question_id.into(), value);
    }

    /// Records a knowledge answer (1 for correct, 0 otherwise).
    pub fn answer_knowledge(&mut self, question_id: impl Into<String>, value: i32) {
        self.knowledge.insert(question_id.into(), value);
    }

    pub fn next_step(&mut self) {
        self.step = match self.step {
            SurveyStep::Assets => SurveyStep::Consumption,
            SurveyStep::Consumption => {
                self.answers.consumption_score = self.consumption.values().sum();
                SurveyStep::Knowledge
            }
            SurveyStep::Knowledge => SurveyStep::Knowledge,
        };
    }

    pub fn previous_step(&mut self) {
        self.step = match self.step {
            SurveyStep::Assets | SurveyStep::Consumption => SurveyStep::Assets,
            SurveyStep::Knowledge => SurveyStep::Consumption,
        };
    }

    /// Produces the payload to submit.
    #[must_use]
    pub fn finish(&self) -> SurveyAnswers {
        let mut answers = self.answers.clone();
        answers.consumption_score = self.consumption.values().sum();
        answers.fin_know_score = self.knowledge.values().sum();
        answers
    }
}
