use quiz_core::model::LeaderboardPage;

use crate::api::dto::{LeaderboardRowDto, PageDto};
use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::session_store::SessionStore;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Users ordered by stat sum, one page at a time.
#[derive(Clone)]
pub struct LeaderboardService {
    api: ApiClient,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches the zero-based `page`. A `size` of zero falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the body is malformed.
    pub async fn page(
        &self,
        session: &SessionStore,
        page: u32,
        size: u32,
    ) -> Result<LeaderboardPage, ApiError> {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        let request = ApiRequest::get(["leaderboard"])
            .with_query("page", page)
            .with_query("size", size);
        let dto: PageDto<LeaderboardRowDto> = self.api.fetch(session, request).await?;

        let mut page_out = LeaderboardPage::from(dto);
        // A page without metadata reports what was requested.
        if page_out.size == 0 {
            page_out.size = size;
            page_out.page = page;
        }
        Ok(page_out)
    }
}
