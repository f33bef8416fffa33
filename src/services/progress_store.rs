use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    models::progress::UserProgress,
    services::storage::{load_state, save_state, KeyValueStore},
};

pub const PROGRESS_STORE_KEY: &str = "user-store";

pub struct UserProgressStore {
    progress: UserProgress,
    storage: Arc<dyn KeyValueStore>,
}

impl UserProgressStore {
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let progress = load_state(storage.as_ref(), PROGRESS_STORE_KEY)
            .await
            .unwrap_or_default();
        Self { progress, storage }
    }

    pub fn progress(&self) -> UserProgress {
        self.progress
    }

    pub async fn add_coins(&mut self, amount: u64) -> UserProgress {
        self.progress.coins = self.progress.coins.saturating_add(amount);
        debug!(amount, coins = self.progress.coins, "coins added");
        self.persist().await
    }

    pub async fn add_level(&mut self, levels: u32) -> UserProgress {
        self.progress.level = self.progress.level.saturating_add(levels);
        debug!(levels, level = self.progress.level, "level added");
        self.persist().await
    }

    pub async fn add_rides(&mut self, rides: u32) -> UserProgress {
        self.progress.total_rides = self.progress.total_rides.saturating_add(rides);
        debug!(rides, total_rides = self.progress.total_rides, "rides added");
        self.persist().await
    }

    async fn persist(&self) -> UserProgress {
        if let Err(err) = save_state(self.storage.as_ref(), PROGRESS_STORE_KEY, &self.progress).await
        {
            warn!("persisting user progress failed: {err}");
        }
        self.progress
    }
}
