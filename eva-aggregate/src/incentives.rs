//! Incentive lists for the list view.

use eva_data::date_range::DateRange;
use eva_data::incentive::{IncentiveDataset, IncentiveRecord};
use eva_data::Region;
use std::collections::BTreeMap;

/// Incentives of one region enacted inside the range, oldest first.
/// An unknown region yields an empty list.
pub fn incentives_in_range(
    range: &DateRange,
    region: &str,
    incentives: &IncentiveDataset,
) -> Vec<IncentiveRecord> {
    let mut list: Vec<IncentiveRecord> = incentives
        .region(region)
        .iter()
        .filter(|i| range.contains_date(&i.date))
        .cloned()
        .collect();
    list.sort_by_key(|i| i.date);
    list
}

/// Incentives inside the range grouped by region, each group oldest first.
/// Regions with nothing in the range are left out.
pub fn incentives_by_region(
    range: &DateRange,
    incentives: &IncentiveDataset,
) -> BTreeMap<Region, Vec<IncentiveRecord>> {
    let grouped: BTreeMap<Region, Vec<IncentiveRecord>> = incentives
        .regions()
        .map(|region| (region.to_string(), incentives_in_range(range, region, incentives)))
        .filter(|(_, list)| !list.is_empty())
        .collect();
    log::debug!(
        "[EVA Debug] aggregate: incentives over {} in {} regions",
        range,
        grouped.len()
    );
    grouped
}
