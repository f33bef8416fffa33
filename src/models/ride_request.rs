use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    /// Avatar URI.
    pub image: String,
    pub rating: f64,
    pub trips: u32,
}

/// A ride request waiting for the driver to accept or decline it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub passenger: Passenger,
    pub distance: String,
    pub duration: String,
    pub fare: f64,
    pub timestamp: DateTime<Utc>,
}

/// Timestamp as handed in by a caller: either already a point in time, or a
/// string that still needs parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampInput {
    At(DateTime<Utc>),
    Raw(String),
}

impl TimestampInput {
    pub fn normalize(self) -> Result<DateTime<Utc>, AppError> {
        match self {
            TimestampInput::At(ts) => Ok(ts),
            TimestampInput::Raw(raw) => parse_timestamp(&raw),
        }
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::At(ts)
    }
}

impl From<String> for TimestampInput {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for TimestampInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

// JSON has no native date type, so anything arriving over the wire is raw.
impl<'de> Deserialize<'de> for TimestampInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Raw)
    }
}

/// Input shape of `add_ride_request`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewRideRequest {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub passenger: Passenger,
    pub distance: String,
    pub duration: String,
    pub fare: f64,
    pub timestamp: TimestampInput,
}

impl NewRideRequest {
    pub fn normalize(self) -> Result<RideRequest, AppError> {
        Ok(RideRequest {
            timestamp: self.timestamp.normalize()?,
            id: self.id,
            pickup: self.pickup,
            dropoff: self.dropoff,
            passenger: self.passenger,
            distance: self.distance,
            duration: self.duration,
            fare: self.fare,
        })
    }
}

impl From<RideRequest> for NewRideRequest {
    fn from(request: RideRequest) -> Self {
        Self {
            id: request.id,
            pickup: request.pickup,
            dropoff: request.dropoff,
            passenger: request.passenger,
            distance: request.distance,
            duration: request.duration,
            fare: request.fare,
            timestamp: TimestampInput::At(request.timestamp),
        }
    }
}

/// Accepts RFC 3339, an offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC)
/// and a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(AppError::InvalidTimestamp(raw.to_string()))
}
