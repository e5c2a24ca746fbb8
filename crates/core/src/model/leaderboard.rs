use crate::model::ids::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub nickname: String,
    pub stat_sum: i64,
}

/// One page of the leaderboard, ordered by stat sum descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardPage {
    pub entries: Vec<LeaderboardEntry>,
    /// Zero-based page number.
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub first: bool,
    pub last: bool,
}

impl LeaderboardPage {
    /// Entries paired with their overall 1-based standing.
    pub fn ranked(&self) -> impl Iterator<Item = (u64, &LeaderboardEntry)> + '_ {
        let offset = u64::from(self.page) * u64::from(self.size);
        self.entries
            .iter()
            .zip(1_u64..)
            .map(move |(entry, index)| (offset + index, entry))
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        !self.first && self.page > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.last
    }
}
