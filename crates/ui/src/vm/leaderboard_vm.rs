use quiz_core::model::LeaderboardPage;
use services::DEFAULT_PAGE_SIZE;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::task::until_cancelled;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardRowVm {
    pub position: u64,
    pub nickname: String,
    pub stat_sum: i64,
}

/// Paged leaderboard with previous/next navigation.
pub struct LeaderboardVm {
    size: u32,
    current: Option<LeaderboardPage>,
}

impl Default for LeaderboardVm {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl LeaderboardVm {
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            size,
            current: None,
        }
    }

    #[must_use]
    pub fn page_number(&self) -> u32 {
        self.current.as_ref().map_or(0, |page| page.page)
    }

    #[must_use]
    pub fn rows(&self) -> Vec<LeaderboardRowVm> {
        self.current
            .as_ref()
            .map(|page| {
                page.ranked()
                    .map(|(position, entry)| LeaderboardRowVm {
                        position,
                        nickname: entry.nickname.clone(),
                        stat_sum: entry.stat_sum,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current.as_ref().is_some_and(LeaderboardPage::has_next)
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(LeaderboardPage::has_previous)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Unauthenticated` without a live session and
    /// `ViewError::Cancelled` when `cancel` fires first.
    pub async fn load(
        &mut self,
        ctx: &AppContext,
        page: u32,
        cancel: &CancellationToken,
    ) -> Result<(), ViewError> {
        let session = ctx.session();
        if !session.is_authenticated() {
            return Err(ViewError::Unauthenticated);
        }
        let service = ctx.leaderboard();
        let fetched = until_cancelled(cancel, service.page(session, page, self.size)).await??;
        self.current = Some(fetched);
        Ok(())
    }

    /// Loads the following page; stays put on the last one.
    ///
    /// # Errors
    ///
    /// Same as [`LeaderboardVm::load`].
    pub async fn next(&mut self, ctx: &AppContext, cancel: &CancellationToken) -> Result<(), ViewError> {
        if !self.has_next() {
            return Ok(());
        }
        let page = self.page_number() + 1;
        self.load(ctx, page, cancel).await
    }

    /// # Errors
    ///
    /// Same as [`LeaderboardVm::load`].
    pub async fn previous(&mut self, ctx: &AppContext, cancel: &CancellationToken) -> Result<(), ViewError> {
        if !self.has_previous() {
            return Ok(());
        }
        let page = self.page_number().saturating_sub(1);
        self.load(ctx, page, cancel).await
    }
}
