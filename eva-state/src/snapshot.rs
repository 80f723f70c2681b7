//! The immutable state handed to every view in one propagation cycle.

use crate::selection::Selection;
use eva_aggregate::filters::FilterSet;
use eva_aggregate::models::{AggregatedSeries, RegionSummary, SeriesCategory, StationMarker};
use eva_aggregate::{
    aggregate_events_by_month, combined_sales_series_by_month, incentives_by_region,
    incentives_in_range, region_summaries, sales_series_by_month, stations_in_range,
};
use eva_data::incentive::IncentiveRecord;
use eva_data::sales::Powertrain;
use eva_data::{Datasets, Region};
use serde::Serialize;
use std::cell::{Cell, OnceCell};
use std::collections::BTreeMap;

/// Incentives shown by the list view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
pub enum IncentiveList {
    /// A region is selected: its incentives, oldest first.
    Region {
        region: Region,
        incentives: Vec<IncentiveRecord>,
    },
    /// No region selected: every region with at least one incentive.
    AllRegions {
        groups: BTreeMap<Region, Vec<IncentiveRecord>>,
    },
}

impl IncentiveList {
    pub fn len(&self) -> usize {
        match self {
            IncentiveList::Region { incentives, .. } => incentives.len(),
            IncentiveList::AllRegions { groups } => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selection, filters and the aggregates derived from them.
///
/// Aggregates are computed on first access and then shared, so however many
/// views read the same quantity during a cycle it is computed once.
#[derive(Debug)]
pub struct Snapshot {
    pub selection: Selection,
    pub filters: FilterSet,
    datasets: Datasets,
    summaries: OnceCell<Vec<RegionSummary>>,
    series: OnceCell<AggregatedSeries>,
    stations: OnceCell<Vec<StationMarker>>,
    incentives: OnceCell<IncentiveList>,
    computations: Cell<u32>,
}

impl Snapshot {
    pub fn new(selection: Selection, filters: FilterSet, datasets: Datasets) -> Self {
        Snapshot {
            selection,
            filters,
            datasets,
            summaries: OnceCell::new(),
            series: OnceCell::new(),
            stations: OnceCell::new(),
            incentives: OnceCell::new(),
            computations: Cell::new(0),
        }
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn region(&self) -> Option<&str> {
        self.selection.region.as_deref()
    }

    /// Number of aggregates computed so far for this snapshot.
    pub fn computations(&self) -> u32 {
        self.computations.get()
    }

    fn computed<'a, T>(&'a self, cell: &'a OnceCell<T>, compute: impl FnOnce() -> T) -> &'a T {
        cell.get_or_init(|| {
            self.computations.set(self.computations.get() + 1);
            compute()
        })
    }

    /// Tooltip rows of every region.
    pub fn region_summaries(&self) -> &[RegionSummary] {
        let summaries: &Vec<RegionSummary> = self.computed(&self.summaries, || {
            region_summaries(&self.selection.date_range, &self.filters, &self.datasets)
        });
        summaries
    }

    /// Chart lines for the enabled categories.
    ///
    /// Aggregate mode plots one `AllSales` line instead of the three
    /// powertrains. Categories whose dataset failed to load are absent.
    pub fn chart_series(&self) -> &AggregatedSeries {
        self.computed(&self.series, || {
            let range = &self.selection.date_range;
            let region = self.region();
            let mut series = AggregatedSeries::new();
            if let Some(sales) = self.datasets.sales.as_deref() {
                if self.filters.aggregate_sales {
                    series.insert(
                        SeriesCategory::AllSales,
                        combined_sales_series_by_month(range, region, sales),
                    );
                }
                for (enabled, powertrain) in [
                    (self.filters.ev_sales, Powertrain::Bev),
                    (self.filters.hev_sales, Powertrain::Hev),
                    (self.filters.phev_sales, Powertrain::Phev),
                ] {
                    if enabled {
                        series.insert(
                            SeriesCategory::for_powertrain(powertrain),
                            sales_series_by_month(range, region, sales.table(powertrain)),
                        );
                    }
                }
            }
            if let Some(stations) = self.datasets.stations.as_deref().filter(|_| self.filters.stations) {
                series.insert(
                    SeriesCategory::Stations,
                    aggregate_events_by_month(range, region, stations),
                );
            }
            if let Some(incentives) = self
                .datasets
                .incentives
                .as_deref()
                .filter(|_| self.filters.incentives)
            {
                series.insert(
                    SeriesCategory::Incentives,
                    aggregate_events_by_month(range, region, incentives),
                );
            }
            series
        })
    }

    /// Stations of the selected region, empty when no region is selected or
    /// the stations filter is off.
    pub fn station_markers(&self) -> &[StationMarker] {
        let markers: &Vec<StationMarker> = self.computed(&self.stations, || {
            match (self.region(), self.datasets.stations.as_deref()) {
                (Some(region), Some(stations)) if self.filters.stations => {
                    stations_in_range(&self.selection.date_range, region, stations)
                }
                _ => Vec::new(),
            }
        });
        markers
    }

    /// `None` when the incentives dataset is unavailable.
    pub fn incentive_list(&self) -> Option<&IncentiveList> {
        let incentives = self.datasets.incentives.as_deref()?;
        Some(self.computed(&self.incentives, || {
            let range = &self.selection.date_range;
            match self.region() {
                Some(region) => IncentiveList::Region {
                    region: region.to_string(),
                    incentives: incentives_in_range(range, region, incentives),
                },
                None => IncentiveList::AllRegions {
                    groups: incentives_by_region(range, incentives),
                },
            }
        }))
    }
}
