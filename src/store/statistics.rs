//! Statistics slice.
//!
//! One record per username, replaced on every fetch. Game entry mutations do
//! not touch it, so a record can be stale until the next fetch.

use crate::models::UserStatistics;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct StatisticsSlice {
    by_username: DashMap<String, UserStatistics>,
}

impl StatisticsSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, username: &str, statistics: UserStatistics) {
        self.by_username.insert(username.to_string(), statistics);
    }

    pub fn get(&self, username: &str) -> Option<UserStatistics> {
        self.by_username.get(username).map(|s| s.clone())
    }

    pub fn clear(&self) {
        self.by_username.clear();
    }
}
