pub mod progress_store;
pub mod ride_store;
pub mod storage;
