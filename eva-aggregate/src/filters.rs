//! The six display toggles shared by the aggregator and the filter store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One toggle of the filter checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterKey {
    EvSales,
    HevSales,
    PhevSales,
    AggregateSales,
    Stations,
    Incentives,
}

impl FilterKey {
    pub const ALL: [FilterKey; 6] = [
        FilterKey::EvSales,
        FilterKey::HevSales,
        FilterKey::PhevSales,
        FilterKey::AggregateSales,
        FilterKey::Stations,
        FilterKey::Incentives,
    ];

    /// Name used in interaction scripts and on the command line.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FilterKey::EvSales => "evSales",
            FilterKey::HevSales => "hevSales",
            FilterKey::PhevSales => "phevSales",
            FilterKey::AggregateSales => "aggregateSales",
            FilterKey::Stations => "stations",
            FilterKey::Incentives => "incentives",
        }
    }

    pub fn is_powertrain(&self) -> bool {
        matches!(self, FilterKey::EvSales | FilterKey::HevSales | FilterKey::PhevSales)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FilterKey {
    type Err = String;

    /// Accepts the wire names and the legacy checklist ids (`EV_sales`, `sales_aggregate`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "evSales" | "EV_sales" => Ok(FilterKey::EvSales),
            "hevSales" | "HEV_sales" => Ok(FilterKey::HevSales),
            "phevSales" | "PHEV_sales" => Ok(FilterKey::PhevSales),
            "aggregateSales" | "sales_aggregate" => Ok(FilterKey::AggregateSales),
            "stations" => Ok(FilterKey::Stations),
            "incentives" => Ok(FilterKey::Incentives),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

impl TryFrom<String> for FilterKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterKey> for String {
    fn from(value: FilterKey) -> Self {
        value.wire_name().to_string()
    }
}

/// Which quantities are displayed.
///
/// `aggregate_sales` and any of the three powertrain flags are never on
/// together; `FilterStore` maintains that, this type only stores flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    pub ev_sales: bool,
    pub hev_sales: bool,
    pub phev_sales: bool,
    pub aggregate_sales: bool,
    pub stations: bool,
    pub incentives: bool,
}

impl Default for FilterSet {
    fn default() -> Self {
        FilterSet {
            ev_sales: true,
            hev_sales: true,
            phev_sales: true,
            aggregate_sales: false,
            stations: true,
            incentives: true,
        }
    }
}

impl FilterSet {
    pub fn get(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::EvSales => self.ev_sales,
            FilterKey::HevSales => self.hev_sales,
            FilterKey::PhevSales => self.phev_sales,
            FilterKey::AggregateSales => self.aggregate_sales,
            FilterKey::Stations => self.stations,
            FilterKey::Incentives => self.incentives,
        }
    }

    fn flag_mut(&mut self, key: FilterKey) -> &mut bool {
        match key {
            FilterKey::EvSales => &mut self.ev_sales,
            FilterKey::HevSales => &mut self.hev_sales,
            FilterKey::PhevSales => &mut self.phev_sales,
            FilterKey::AggregateSales => &mut self.aggregate_sales,
            FilterKey::Stations => &mut self.stations,
            FilterKey::Incentives => &mut self.incentives,
        }
    }

    /// Set a single flag without touching the others.
    pub fn with(mut self, key: FilterKey, value: bool) -> Self {
        *self.flag_mut(key) = value;
        self
    }

    pub fn any_powertrain(&self) -> bool {
        self.ev_sales || self.hev_sales || self.phev_sales
    }

    /// True when the aggregate/powertrain exclusion holds.
    pub fn is_consistent(&self) -> bool {
        !(self.aggregate_sales && self.any_powertrain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_both_spellings() {
        for key in FilterKey::ALL {
            assert_eq!(key.wire_name().parse::<FilterKey>(), Ok(key));
        }
        assert_eq!("EV_sales".parse::<FilterKey>(), Ok(FilterKey::EvSales));
        assert_eq!("sales_aggregate".parse::<FilterKey>(), Ok(FilterKey::AggregateSales));
        assert!("bicycles".parse::<FilterKey>().is_err());
    }

    #[test]
    fn default_shows_everything_but_aggregate() {
        let filters = FilterSet::default();
        assert!(filters.is_consistent());
        assert!(!filters.aggregate_sales);
        assert!(FilterKey::ALL
            .iter()
            .filter(|k| **k != FilterKey::AggregateSales)
            .all(|k| filters.get(*k)));
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_string(&FilterSet::default()).unwrap();
        assert!(json.contains(r#""aggregateSales":false"#));
        assert!(json.contains(r#""evSales":true"#));
        let key: FilterKey = serde_json::from_str(r#""phevSales""#).unwrap();
        assert_eq!(key, FilterKey::PhevSales);
    }
}
