//! Interactive state of the EV adoption dashboard.
//!
//! [`Dashboard`] bundles the selection and filter stores with the datasets
//! and the change propagator. Views subscribe with a [`ViewKind`] and are
//! re-run, in map, chart, list, filters order, with a shared [`Snapshot`]
//! whenever the date range, region or filters change.
//!
//! ```rust
//! use eva_state::{Dashboard, DashboardConfig, FilterKey};
//! use eva_data::Datasets;
//!
//! let dashboard = Dashboard::new(Datasets::default(), &DashboardConfig::default());
//! dashboard.on_filter_toggled(FilterKey::AggregateSales, true);
//! assert!(!dashboard.filters().ev_sales);
//! ```

pub mod config;
pub mod dashboard;
pub mod filters;
pub mod propagator;
pub mod range_picker;
pub mod selection;
pub mod snapshot;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Interaction};
pub use filters::{FilterKey, FilterSet, FilterStore};
pub use propagator::{ChangePropagator, Delivery, SubscriptionId, ViewKind};
pub use selection::{Selection, SelectionStore};
pub use snapshot::{IncentiveList, Snapshot};
pub use view::{ChartModel, ListModel, MapModel, ModelView, RenderModel, View};
