use quiz_core::model::{SignupForm, SurveyDraft, SurveyStep};

use crate::context::AppContext;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignupStep {
    BasicInfo,
    Survey(SurveyStep),
    Done,
}

/// Two-stage onboarding: create the account, then answer the survey.
#[derive(Debug, Default)]
pub struct SignupWizard {
    account_created: bool,
    finished: bool,
    draft: SurveyDraft,
}

impl SignupWizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> SignupStep {
        match (self.account_created, self.finished) {
            (false, _) => SignupStep::BasicInfo,
            (true, false) => SignupStep::Survey(self.draft.step()),
            (true, true) => SignupStep::Done,
        }
    }

    pub fn draft_mut(&mut self) -> &mut SurveyDraft {
        &mut self.draft
    }

    /// Registers the account and logs in with it.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Rejected` with the service's message when the
    /// account is refused or the follow-up login fails.
    pub async fn submit_basic_info(&mut self, ctx: &mut AppContext, form: &SignupForm) -> Result<(), ViewError> {
        if self.account_created {
            return Ok(());
        }
        let signup = ctx.signup();
        signup.sign_up(ctx.session_mut(), form).await?;
        self.account_created = true;
        Ok(())
    }

    /// Sends the survey built so far.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::InvalidInput` before the account exists, or the
    /// mapped service error when the survey is not accepted.
    pub async fn submit_survey(&mut self, ctx: &AppContext) -> Result<(), ViewError> {
        if !self.account_created {
            return Err(ViewError::InvalidInput(
                "Create the account before answering the survey.".to_string(),
            ));
        }
        let answers = self.draft.finish();
        ctx.signup().submit_survey(ctx.session(), &answers).await?;
        self.finished = true;
        Ok(())
    }
}
