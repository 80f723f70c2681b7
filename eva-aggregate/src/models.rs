//! Aggregation output models.
//!
//! All structs derive `Serialize` so render back ends can receive them as JSON.

use chrono::NaiveDate;
use eva_data::date_range::YearMonth;
use eva_data::sales::Powertrain;
use eva_data::Region;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Line categories of the time-series chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesCategory {
    Ev,
    Hev,
    Phev,
    /// Sum of the three powertrains, shown instead of them in aggregate mode.
    AllSales,
    Stations,
    Incentives,
}

impl SeriesCategory {
    pub fn for_powertrain(powertrain: Powertrain) -> Self {
        match powertrain {
            Powertrain::Bev => SeriesCategory::Ev,
            Powertrain::Hev => SeriesCategory::Hev,
            Powertrain::Phev => SeriesCategory::Phev,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesCategory::Ev => "BEV sales",
            SeriesCategory::Hev => "HEV sales",
            SeriesCategory::Phev => "PHEV sales",
            SeriesCategory::AllSales => "All sales",
            SeriesCategory::Stations => "Stations",
            SeriesCategory::Incentives => "Policy measures",
        }
    }

    /// Sales lines are running totals, station and incentive lines are not.
    pub fn is_cumulative(&self) -> bool {
        !matches!(self, SeriesCategory::Stations | SeriesCategory::Incentives)
    }
}

impl fmt::Display for SeriesCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single (month, value) pair used for line chart data points.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DatePoint {
    pub date: YearMonth,
    pub value: f64,
}

/// Chart data: one ascending, month-granular sequence per category.
pub type AggregatedSeries = BTreeMap<SeriesCategory, Vec<DatePoint>>;

/// Pro-rated sales per region.
pub type RegionTotals = BTreeMap<Region, f64>;

/// Event counts per region.
pub type RegionCounts = BTreeMap<Region, u64>;

/// Pro-rated sales per region for all three powertrains.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SalesByRegion {
    pub bev: RegionTotals,
    pub hev: RegionTotals,
    pub phev: RegionTotals,
}

impl SalesByRegion {
    pub fn totals(&self, powertrain: Powertrain) -> &RegionTotals {
        match powertrain {
            Powertrain::Bev => &self.bev,
            Powertrain::Hev => &self.hev,
            Powertrain::Phev => &self.phev,
        }
    }

    /// Sales of one powertrain in `region`, zero when the region is unknown.
    pub fn get(&self, powertrain: Powertrain, region: &str) -> f64 {
        self.totals(powertrain).get(region).copied().unwrap_or(0.0)
    }

    /// Sum over the three powertrains.
    pub fn combined(&self, region: &str) -> f64 {
        Powertrain::ALL.iter().map(|p| self.get(*p, region)).sum()
    }
}

/// A charging station plotted on the map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StationMarker {
    pub region: Region,
    pub open_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
}

/// Tooltip contents of one region on the map.
///
/// `None` marks a quantity that is not displayed under the current filters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: Region,
    pub ev_sales: Option<f64>,
    pub hev_sales: Option<f64>,
    pub phev_sales: Option<f64>,
    pub all_sales: Option<f64>,
    pub stations: Option<u64>,
    pub incentives: Option<u64>,
}
