use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::{AppConfig, StorageBackend},
    error::AppError,
    services::{
        progress_store::UserProgressStore,
        ride_store::RideRequestStore,
        storage::{FileStorage, KeyValueStore, MemoryStorage},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub rides: Arc<Mutex<RideRequestStore>>,
    pub progress: Arc<Mutex<UserProgressStore>>,
}

impl AppState {
    pub async fn new(config: AppConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        let rides = RideRequestStore::open(storage.clone()).await;
        let progress = UserProgressStore::open(storage).await;
        Self {
            config,
            rides: Arc::new(Mutex::new(rides)),
            progress: Arc::new(Mutex::new(progress)),
        }
    }

    /// Builds the substrate the config asks for, then opens both stores on it.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn KeyValueStore> = match config.storage_backend {
            StorageBackend::File => {
                let files = FileStorage::new(config.data_root.clone());
                files.ensure_structure().await?;
                Arc::new(files)
            }
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(Self::new(config, storage).await)
    }
}
