//! Core record types and loaders for the EV adoption datasets.
//!
//! Three datasets are loaded once at startup and never mutated afterwards:
//! - annual sales per state, one table per powertrain ([`sales`])
//! - charging stations per state with their opening dates ([`station`])
//! - laws and incentives per state ([`incentive`])
//!
//! [`date_range`] holds the month-granular, half-open range type every
//! aggregation is scoped by.

pub mod date_range;
pub mod error;
pub mod events;
pub mod incentive;
pub mod loader;
pub mod sales;
pub mod station;

use incentive::IncentiveDataset;
use sales::SalesDataset;
use station::StationDataset;
use std::rc::Rc;

/// A US state name as it appears in the datasets (e.g. "California").
pub type Region = String;

/// The loaded datasets, shared read-only by every consumer.
///
/// A dataset whose load failed is `None`; views that need it render blank
/// while the others keep working.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub sales: Option<Rc<SalesDataset>>,
    pub stations: Option<Rc<StationDataset>>,
    pub incentives: Option<Rc<IncentiveDataset>>,
}

impl Datasets {
    pub fn new(
        sales: Option<SalesDataset>,
        stations: Option<StationDataset>,
        incentives: Option<IncentiveDataset>,
    ) -> Self {
        Datasets {
            sales: sales.map(Rc::new),
            stations: stations.map(Rc::new),
            incentives: incentives.map(Rc::new),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.sales.is_some() && self.stations.is_some() && self.incentives.is_some()
    }
}
