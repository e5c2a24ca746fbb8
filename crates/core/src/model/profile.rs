use crate::model::rank::RankTier;

/// Stat value that fills a radar axis completely.
pub const STAT_SCALE_MAX: f64 = 100.0;

/// Account summary shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub nickname: Option<String>,
    pub name: Option<String>,
    pub rank: RankTier,
}

impl UserInfo {
    /// Nickname for greetings, falling back to a neutral label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("User")
    }
}

/// Per-area literacy stats from the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub stats_id: u64,
    pub invest: i64,
    pub credit: i64,
    pub finance: i64,
    pub stat_sum: i64,
    pub character_image: Option<String>,
    pub rank: RankTier,
}

/// Three stats scaled to `0.0..=1.0` for a radar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarAxes {
    pub invest: f64,
    pub credit: f64,
    pub finance: f64,
}

impl UserStats {
    #[must_use]
    pub fn radar_axes(&self) -> RadarAxes {
        RadarAxes {
            invest: scale(self.invest),
            credit: scale(self.credit),
            finance: scale(self.finance),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn scale(value: i64) -> f64 {
    (value as f64 / STAT_SCALE_MAX).clamp(0.0, 1.0)
}
