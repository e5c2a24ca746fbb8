use quiz_core::model::{RadarAxes, RankTier, UserStats};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::task::until_cancelled;

#[derive(Clone, Debug, PartialEq)]
pub struct ProfileVm {
    pub rank: RankTier,
    pub invest: i64,
    pub credit: i64,
    pub finance: i64,
    pub stat_sum: i64,
    pub character_image: Option<String>,
    pub radar: RadarAxes,
}

impl From<&UserStats> for ProfileVm {
    fn from(stats: &UserStats) -> Self {
        Self {
            rank: stats.rank,
            invest: stats.invest,
            credit: stats.credit,
            finance: stats.finance,
            stat_sum: stats.stat_sum,
            character_image: stats.character_image.clone(),
            radar: stats.radar_axes(),
        }
    }
}

/// # Errors
///
/// Returns `ViewError::Unauthenticated` without a live session and
/// `ViewError::Cancelled` when `cancel` fires first.
pub async fn load_profile(ctx: &AppContext, cancel: &CancellationToken) -> Result<ProfileVm, ViewError> {
    let session = ctx.session();
    if !session.is_authenticated() {
        return Err(ViewError::Unauthenticated);
    }
    let profile = ctx.profile();
    let stats = until_cancelled(cancel, profile.user_stats(session)).await??;
    Ok(ProfileVm::from(&stats))
}
