use serde::{Deserialize, Serialize};

/// Gamification counters the dashboard rewards the driver with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub coins: u64,
    pub level: u32,
    pub total_rides: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            coins: 0,
            level: 1,
            total_rides: 0,
        }
    }
}
