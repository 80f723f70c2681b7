use crate::events::{Dated, RegionEvents};
use crate::sales::Powertrain;
use crate::Region;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind of policy measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncentiveCategory {
    LawRegulation,
    StateIncentive,
    FederalIncentive,
}

impl IncentiveCategory {
    /// Label used in the source dataset.
    pub fn label(&self) -> &'static str {
        match self {
            IncentiveCategory::LawRegulation => "Laws and Regulations",
            IncentiveCategory::StateIncentive => "State Incentives",
            IncentiveCategory::FederalIncentive => "Incentives",
        }
    }
}

impl fmt::Display for IncentiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IncentiveCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Laws and Regulations" => Ok(IncentiveCategory::LawRegulation),
            "State Incentives" => Ok(IncentiveCategory::StateIncentive),
            "Incentives" => Ok(IncentiveCategory::FederalIncentive),
            other => Err(format!("unknown incentive category: {}", other)),
        }
    }
}

/// A law, regulation or incentive program enacted by a state or the federal government.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncentiveRecord {
    pub state: Region,
    pub date: NaiveDate,
    pub category: IncentiveCategory,
    pub project_name: String,
    pub types_supported: BTreeSet<Powertrain>,
}

impl IncentiveRecord {
    pub fn supports(&self, powertrain: Powertrain) -> bool {
        self.types_supported.contains(&powertrain)
    }
}

impl Dated for IncentiveRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Parse a `|`-delimited "Types Supported" cell. Unknown codes are ignored.
pub fn parse_types_supported(cell: &str) -> BTreeSet<Powertrain> {
    cell.split('|')
        .filter_map(|code| code.parse::<Powertrain>().ok())
        .collect()
}

/// Incentives grouped by state.
pub type IncentiveDataset = RegionEvents<IncentiveRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_round_trip() {
        for category in [
            IncentiveCategory::LawRegulation,
            IncentiveCategory::StateIncentive,
            IncentiveCategory::FederalIncentive,
        ] {
            assert_eq!(category.label().parse::<IncentiveCategory>().unwrap(), category);
        }
        assert!("Grants".parse::<IncentiveCategory>().is_err());
    }

    #[test]
    fn types_supported_cell() {
        let types = parse_types_supported("ELEC|PHEV|HY");
        assert_eq!(types, BTreeSet::from([Powertrain::Bev, Powertrain::Phev]));
        assert!(parse_types_supported("").is_empty());
    }
}
