pub mod progress;
pub mod ride_request;
