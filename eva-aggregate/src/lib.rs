//! Date-range scoped aggregation of the EV adoption datasets.
//!
//! Every function here is pure: it reads the immutable datasets and a
//! [`DateRange`](eva_data::date_range::DateRange) and returns fresh output
//! models from [`models`]. Views recompute everything they show from these
//! functions on every selection change; a memoized implementation can be
//! swapped in behind the same signatures.
//!
//! All ranges are half-open, `[start, end)`, in every function.
//!
//! - [`sales`]: pro-rated totals per region and cumulative monthly curves
//! - [`events`]: per-month counts and per-region counts of stations/incentives
//! - [`incentives`]: filtered incentive lists for the list view
//! - [`summary`]: per-region tooltip rows honoring a [`FilterSet`]

pub mod events;
pub mod filters;
pub mod incentives;
pub mod models;
pub mod sales;
pub mod summary;

pub use events::{aggregate_events_by_month, count_by_region, stations_in_range};
pub use filters::{FilterKey, FilterSet};
pub use incentives::{incentives_by_region, incentives_in_range};
pub use sales::{
    aggregate_sales_by_month, aggregate_sales_by_region, combined_sales_series_by_month,
    sales_by_region_all, sales_series_by_month,
};
pub use summary::region_summaries;
