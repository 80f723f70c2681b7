//! Per-region rows behind the map tooltips.

use crate::events::count_by_region;
use crate::filters::FilterSet;
use crate::models::RegionSummary;
use crate::sales::sales_by_region_all;
use eva_data::date_range::DateRange;
use eva_data::sales::Powertrain;
use eva_data::{Datasets, Region};
use std::collections::BTreeSet;

/// One row per region known to any loaded dataset.
///
/// A quantity whose filter is off, or whose dataset failed to load, is
/// `None`. Incentive counts are shown regardless of the filter set.
/// In aggregate mode the three powertrains are reported as one combined
/// figure instead.
pub fn region_summaries(
    range: &DateRange,
    filters: &FilterSet,
    datasets: &Datasets,
) -> Vec<RegionSummary> {
    let sales = datasets
        .sales
        .as_deref()
        .map(|sales| sales_by_region_all(range, sales));
    let stations = datasets
        .stations
        .as_deref()
        .filter(|_| filters.stations)
        .map(|stations| count_by_region(range, stations));
    let incentives = datasets
        .incentives
        .as_deref()
        .map(|incentives| count_by_region(range, incentives));

    let mut regions: BTreeSet<Region> = BTreeSet::new();
    if let Some(dataset) = datasets.sales.as_deref() {
        for table in dataset.tables() {
            regions.extend(table.regions().map(str::to_string));
        }
    }
    if let Some(dataset) = datasets.stations.as_deref() {
        regions.extend(dataset.regions().map(str::to_string));
    }
    if let Some(dataset) = datasets.incentives.as_deref() {
        regions.extend(dataset.regions().map(str::to_string));
    }

    let summaries: Vec<RegionSummary> = regions
        .into_iter()
        .map(|region| {
            let sales_for = |enabled: bool, powertrain: Powertrain| {
                sales
                    .as_ref()
                    .filter(|_| enabled)
                    .map(|s| s.get(powertrain, &region))
            };
            RegionSummary {
                ev_sales: sales_for(filters.ev_sales, Powertrain::Bev),
                hev_sales: sales_for(filters.hev_sales, Powertrain::Hev),
                phev_sales: sales_for(filters.phev_sales, Powertrain::Phev),
                all_sales: sales
                    .as_ref()
                    .filter(|_| filters.aggregate_sales)
                    .map(|s| s.combined(&region)),
                stations: stations
                    .as_ref()
                    .map(|counts| counts.get(&region).copied().unwrap_or(0)),
                incentives: incentives
                    .as_ref()
                    .map(|counts| counts.get(&region).copied().unwrap_or(0)),
                region,
            }
        })
        .collect();
    log::debug!(
        "[EVA Debug] aggregate: {} region summaries over {}",
        summaries.len(),
        range
    );
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterKey;
    use eva_data::date_range::YearMonth;
    use eva_data::loader::{load_incentives, load_sales_table, load_stations};
    use eva_data::sales::SalesDataset;

    fn sample_datasets() -> Datasets {
        let sales = SalesDataset {
            bev: load_sales_table(Powertrain::Bev, "stateName,2016\nCalifornia,1200\n").unwrap(),
            hev: load_sales_table(Powertrain::Hev, "stateName,2016\nCalifornia,120\nOhio,12\n")
                .unwrap(),
            phev: load_sales_table(Powertrain::Phev, "stateName,2016\nCalifornia,24\n").unwrap(),
        };
        let stations = load_stations(
            r#"{"California": [{"Open Date": "2016-02-01"}, {"Open Date": "2016-05-01"}]}"#,
        )
        .unwrap();
        let incentives = load_incentives(
            r#"{"Nevada": [{"Date": "2016-01-20", "Category": "State Incentives", "Project Name": "X"}]}"#,
        )
        .unwrap();
        Datasets::new(Some(sales), Some(stations), Some(incentives))
    }

    fn q1_2016() -> DateRange {
        DateRange::new(YearMonth::january(2016), YearMonth::new(2016, 3).unwrap())
    }

    #[test]
    fn rows_cover_every_region_with_defaults() {
        let summaries = region_summaries(&q1_2016(), &FilterSet::default(), &sample_datasets());
        let names: Vec<&str> = summaries.iter().map(|s| s.region.as_str()).collect();
        assert_eq!(names, vec!["California", "Nevada", "Ohio"]);

        let ca = &summaries[0];
        assert_eq!(ca.ev_sales, Some(300.0));
        assert_eq!(ca.hev_sales, Some(30.0));
        assert_eq!(ca.phev_sales, Some(6.0));
        assert_eq!(ca.all_sales, None);
        assert_eq!(ca.stations, Some(1));
        assert_eq!(ca.incentives, Some(0));

        let nv = &summaries[1];
        assert_eq!(nv.ev_sales, Some(0.0));
        assert_eq!(nv.incentives, Some(1));
    }

    #[test]
    fn disabled_filters_hide_quantities() {
        let filters = FilterSet::default()
            .with(FilterKey::EvSales, false)
            .with(FilterKey::HevSales, false)
            .with(FilterKey::PhevSales, false)
            .with(FilterKey::AggregateSales, true)
            .with(FilterKey::Stations, false)
            .with(FilterKey::Incentives, false);
        let summaries = region_summaries(&q1_2016(), &filters, &sample_datasets());
        let ca = &summaries[0];
        assert_eq!(ca.ev_sales, None);
        assert_eq!(ca.all_sales, Some(336.0));
        assert_eq!(ca.stations, None);
        assert_eq!(ca.incentives, Some(0), "incentives are always shown");
    }

    #[test]
    fn missing_dataset_blanks_only_its_column() {
        let mut datasets = sample_datasets();
        datasets.sales = None;
        let summaries = region_summaries(&q1_2016(), &FilterSet::default(), &datasets);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.ev_sales.is_none()));
        assert_eq!(summaries[0].stations, Some(1));
    }
}
