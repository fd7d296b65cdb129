use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::constants::STORE_TIMESTAMP_FORMAT;

/// One reading of one station at one hour.
///
/// `(timestamp, station)` is the natural key. `value` is `None` when a stored
/// row carried something that is not a number; snapshot parsing never emits
/// such observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub station: String,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, station: String, value: Option<f64>) -> Self {
        Self {
            timestamp,
            station,
            value,
        }
    }

    pub fn key(&self) -> (NaiveDateTime, &str) {
        (self.timestamp, self.station.as_str())
    }

    /// Fields in store column order
    pub fn to_store_record(&self) -> [String; 3] {
        [
            self.timestamp.format(STORE_TIMESTAMP_FORMAT).to_string(),
            self.station.clone(),
            self.value.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}
