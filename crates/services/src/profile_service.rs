use quiz_core::model::{RankTier, UserInfo, UserStats};

use crate::api::dto::{CharacterImageDto, Envelope, UserInfoDto, UserStatsDto};
use crate::api::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::session_store::SessionStore;

const DEFAULT_PROFILE_FAILURE: &str = "Could not load user info.";

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the service answers without `success`,
    /// or any other `ApiError` when the request fails.
    pub async fn user_info(&self, session: &SessionStore) -> Result<UserInfo, ApiError> {
        let envelope: Envelope<UserInfoDto> = self
            .api
            .fetch(session, ApiRequest::get(["users", "getUserinfo"]))
            .await?;
        match envelope {
            Envelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data.into()),
            Envelope { message, .. } => Err(ApiError::Rejected {
                message: message.unwrap_or_else(|| DEFAULT_PROFILE_FAILURE.to_string()),
            }),
        }
    }

    /// The user's rank tier; unrecognised tiers read as Bronze.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileService::user_info`].
    pub async fn user_rank(&self, session: &SessionStore) -> Result<RankTier, ApiError> {
        Ok(self.user_info(session).await?.rank)
    }

    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the body is malformed.
    pub async fn user_stats(&self, session: &SessionStore) -> Result<UserStats, ApiError> {
        let dto: UserStatsDto = self
            .api
            .fetch(session, ApiRequest::get(["stats", "getuserstats"]))
            .await?;
        Ok(dto.into())
    }

    /// Name of the character image matching the user's stats, if one is assigned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the body is malformed.
    pub async fn character_image(&self, session: &SessionStore) -> Result<Option<String>, ApiError> {
        let dto: CharacterImageDto = self
            .api
            .fetch(session, ApiRequest::get(["stats", "weebee-image"]))
            .await?;
        Ok(dto.image_name.filter(|name| !name.trim().is_empty()))
    }
}
