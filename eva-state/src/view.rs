//! Views and the render models they are given.
//!
//! A render model is a plain, serializable description of what a view
//! shows, built from a [`Snapshot`]. Drawing it is up to the front end.

use crate::dashboard::Dashboard;
use crate::propagator::ViewKind;
use crate::snapshot::{IncentiveList, Snapshot};
use eva_aggregate::filters::FilterSet;
use eva_aggregate::models::{AggregatedSeries, RegionSummary, StationMarker};
use eva_data::date_range::DateRange;
use eva_data::Region;
use serde::Serialize;

/// Something that re-renders when the selection changes.
///
/// `dashboard` lets a view raise interactions of its own; those are applied
/// at once but reach the views only after the current cycle.
pub trait View {
    fn on_selection_changed(&mut self, snapshot: &Snapshot, dashboard: &Dashboard);
}

/// Choropleth map: tooltip rows, station markers and the highlighted region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapModel {
    pub date_range: DateRange,
    pub selected_region: Option<Region>,
    pub regions: Vec<RegionSummary>,
    pub stations: Vec<StationMarker>,
}

impl MapModel {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        MapModel {
            date_range: snapshot.selection.date_range,
            selected_region: snapshot.selection.region.clone(),
            regions: snapshot.region_summaries().to_vec(),
            stations: snapshot.station_markers().to_vec(),
        }
    }

    pub fn summary(&self, region: &str) -> Option<&RegionSummary> {
        self.regions.iter().find(|s| s.region == region)
    }

    /// Region to select after a click on `clicked`: clicking the selected
    /// region again clears the selection.
    pub fn toggle(&self, clicked: &str) -> Option<Region> {
        toggle_region(self.selected_region.as_deref(), clicked)
    }
}

pub(crate) fn toggle_region(selected: Option<&str>, clicked: &str) -> Option<Region> {
    if selected == Some(clicked) {
        None
    } else {
        Some(clicked.to_string())
    }
}

/// Time-series chart lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub date_range: DateRange,
    pub region: Option<Region>,
    pub series: AggregatedSeries,
}

impl ChartModel {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        ChartModel {
            date_range: snapshot.selection.date_range,
            region: snapshot.selection.region.clone(),
            series: snapshot.chart_series().clone(),
        }
    }
}

/// Incentive list; `incentives` is `None` when the dataset did not load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModel {
    pub date_range: DateRange,
    pub incentives: Option<IncentiveList>,
}

impl ListModel {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        ListModel {
            date_range: snapshot.selection.date_range,
            incentives: snapshot.incentive_list().cloned(),
        }
    }
}

/// The filter checklist, mirroring the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersModel {
    pub filters: FilterSet,
}

/// Any of the four render models, tagged by view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum RenderModel {
    Map(MapModel),
    Chart(ChartModel),
    List(ListModel),
    Filters(FiltersModel),
}

impl RenderModel {
    pub fn build(kind: ViewKind, snapshot: &Snapshot) -> Self {
        match kind {
            ViewKind::Map => RenderModel::Map(MapModel::from_snapshot(snapshot)),
            ViewKind::Chart => RenderModel::Chart(ChartModel::from_snapshot(snapshot)),
            ViewKind::List => RenderModel::List(ListModel::from_snapshot(snapshot)),
            ViewKind::Filters => RenderModel::Filters(FiltersModel {
                filters: snapshot.filters,
            }),
        }
    }

    pub fn kind(&self) -> ViewKind {
        match self {
            RenderModel::Map(_) => ViewKind::Map,
            RenderModel::Chart(_) => ViewKind::Chart,
            RenderModel::List(_) => ViewKind::List,
            RenderModel::Filters(_) => ViewKind::Filters,
        }
    }
}

/// A view that builds its render model each cycle and hands it to `sink`.
pub struct ModelView<F> {
    kind: ViewKind,
    sink: F,
}

impl<F: FnMut(RenderModel)> ModelView<F> {
    pub fn new(kind: ViewKind, sink: F) -> Self {
        ModelView { kind, sink }
    }
}

impl<F: FnMut(RenderModel)> View for ModelView<F> {
    fn on_selection_changed(&mut self, snapshot: &Snapshot, _dashboard: &Dashboard) {
        (self.sink)(RenderModel::build(self.kind, snapshot));
    }
}
