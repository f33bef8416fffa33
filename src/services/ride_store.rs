use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::AppError,
    models::ride_request::{NewRideRequest, RideRequest},
    services::storage::{load_state, save_state, KeyValueStore},
};

pub const RIDE_STORE_KEY: &str = "ride-store";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRidesRef<'a> {
    pending_requests: &'a [RideRequest],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedRides {
    pending_requests: Vec<RideRequest>,
}

/// Pending ride requests, newest first, saved after every mutation.
///
/// Ids are unique: adding a request whose id is already pending replaces the
/// old entry and moves it to the front.
pub struct RideRequestStore {
    pending: Vec<RideRequest>,
    storage: Arc<dyn KeyValueStore>,
}

impl RideRequestStore {
    /// Rehydrates from `storage`, starting empty when nothing usable is stored.
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        let pending = load_state::<PersistedRides>(storage.as_ref(), RIDE_STORE_KEY)
            .await
            .map(|state| state.pending_requests)
            .unwrap_or_default();
        info!(count = pending.len(), "ride request store opened");
        Self { pending, storage }
    }

    pub fn pending_requests(&self) -> &[RideRequest] {
        &self.pending
    }

    /// A malformed timestamp rejects the request and leaves the store as is.
    pub async fn add_ride_request(
        &mut self,
        request: NewRideRequest,
    ) -> Result<&RideRequest, AppError> {
        let request = request.normalize()?;
        debug!(id = %request.id, timestamp = %request.timestamp, "adding ride request");

        let before = self.pending.len();
        self.pending.retain(|existing| existing.id != request.id);
        if self.pending.len() != before {
            info!(id = %request.id, "replacing pending ride request with the same id");
        }
        self.pending.insert(0, request);

        self.persist().await;
        Ok(&self.pending[0])
    }

    pub async fn remove_ride_request(&mut self, id: &str) {
        let before = self.pending.len();
        self.pending.retain(|request| request.id != id);
        if self.pending.len() == before {
            debug!(id, "no pending ride request to remove");
        } else {
            debug!(id, "removed ride request");
        }

        self.persist().await;
    }

    // Best effort: the in-memory sequence stays authoritative for this process.
    async fn persist(&self) {
        let state = PersistedRidesRef {
            pending_requests: &self.pending,
        };
        if let Err(err) = save_state(self.storage.as_ref(), RIDE_STORE_KEY, &state).await {
            warn!("persisting ride requests failed: {err}");
        }
    }
}
