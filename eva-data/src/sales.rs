use crate::Region;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Electrified powertrain categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Powertrain {
    /// Battery-electric ("ELEC" in the incentives data)
    Bev,
    /// Hybrid
    Hev,
    /// Plug-in hybrid
    Phev,
}

impl Powertrain {
    pub const ALL: [Powertrain; 3] = [Powertrain::Bev, Powertrain::Hev, Powertrain::Phev];

    /// Code used by the incentives dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Powertrain::Bev => "ELEC",
            Powertrain::Hev => "HEV",
            Powertrain::Phev => "PHEV",
        }
    }
}

impl fmt::Display for Powertrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Powertrain::Bev => "BEV",
            Powertrain::Hev => "HEV",
            Powertrain::Phev => "PHEV",
        };
        f.write_str(label)
    }
}

impl FromStr for Powertrain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ELEC" | "BEV" | "EV" => Ok(Powertrain::Bev),
            "HEV" => Ok(Powertrain::Hev),
            "PHEV" => Ok(Powertrain::Phev),
            other => Err(format!("unknown powertrain code: {}", other)),
        }
    }
}

/// One state's annual sales, one entry per year column of the source table.
///
/// A `None` value marks a cell that was present but not numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRow {
    pub state: Region,
    pub annual: BTreeMap<i32, Option<f64>>,
}

impl SalesRow {
    /// Annual sales for `year`; missing and malformed cells both read as `None`.
    pub fn annual(&self, year: i32) -> Option<f64> {
        self.annual.get(&year).copied().flatten()
    }
}

/// Annual sales by state for a single powertrain.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    pub powertrain: Powertrain,
    /// Year columns present in the source, which define the table's coverage.
    pub years: BTreeSet<i32>,
    pub rows: Vec<SalesRow>,
}

impl SalesTable {
    pub fn new(powertrain: Powertrain) -> Self {
        SalesTable {
            powertrain,
            years: BTreeSet::new(),
            rows: Vec::new(),
        }
    }

    /// First row for `state`, if any.
    pub fn row(&self, state: &str) -> Option<&SalesRow> {
        self.rows.iter().find(|row| row.state == state)
    }

    pub fn covers_year(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.state.as_str())
    }
}

/// The three powertrain sales tables.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesDataset {
    pub bev: SalesTable,
    pub hev: SalesTable,
    pub phev: SalesTable,
}

impl SalesDataset {
    pub fn table(&self, powertrain: Powertrain) -> &SalesTable {
        match powertrain {
            Powertrain::Bev => &self.bev,
            Powertrain::Hev => &self.hev,
            Powertrain::Phev => &self.phev,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &SalesTable> {
        [&self.bev, &self.hev, &self.phev].into_iter()
    }
}
