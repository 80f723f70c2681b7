use crate::events::{Dated, RegionEvents};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A public charging station and the day it opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub open_date: NaiveDate,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
}

impl StationRecord {
    /// Both coordinates, when the source carried them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl Dated for StationRecord {
    fn date(&self) -> NaiveDate {
        self.open_date
    }
}

/// Charging stations grouped by state.
pub type StationDataset = RegionEvents<StationRecord>;
