//! Dashboard settings, optionally read from a JSON file.

use crate::propagator::Delivery;
use eva_aggregate::filters::FilterSet;
use eva_data::date_range::DateRange;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Startup settings of a [`Dashboard`](crate::dashboard::Dashboard).
///
/// ```json
/// { "defaultRange": { "start": "2018-01", "end": "2022-01" }, "debounceMs": 16 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    /// Range selected at startup.
    pub default_range: DateRange,
    /// Outer limits of the range picker.
    pub picker_bounds: DateRange,
    /// Initial filter checklist.
    pub filters: FilterSet,
    /// Trailing-edge debounce of the fan-out; `None` fans out on every change.
    pub debounce_ms: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            default_range: DateRange::default(),
            picker_bounds: DateRange::default(),
            filters: FilterSet::default(),
            debounce_ms: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn delivery(&self) -> Delivery {
        match self.debounce_ms {
            Some(ms) if ms > 0 => Delivery::Debounced(Duration::from_millis(ms)),
            _ => Delivery::Immediate,
        }
    }
}
