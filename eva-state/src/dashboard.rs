//! The dashboard context: stores, datasets and propagation in one handle.

use crate::config::DashboardConfig;
use crate::filters::{FilterKey, FilterSet, FilterStore};
use crate::propagator::{ChangePropagator, Notify, SubscriptionId, ViewKind};
use crate::range_picker::RangePicker;
use crate::selection::{Selection, SelectionStore};
use crate::snapshot::Snapshot;
use crate::view::{toggle_region, View};
use chrono::NaiveDate;
use eva_data::date_range::{DateRange, YearMonth};
use eva_data::{Datasets, Region};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// A user interaction, as raised by a view or read from a script.
///
/// ```json
/// {"event": "dateRangeChanged", "start": "2018-01", "end": "2020-01"}
/// {"event": "regionSelected", "region": "California"}
/// {"event": "filterToggled", "key": "aggregateSales", "value": true}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Interaction {
    DateRangeChanged { start: YearMonth, end: YearMonth },
    RegionSelected { region: Option<Region> },
    /// A map click: selects `region`, or clears it when already selected.
    RegionClicked { region: Region },
    FilterToggled { key: FilterKey, value: bool },
    /// Timeline handle drags, clamped by the range picker.
    DragStart { date: NaiveDate },
    DragEnd { date: NaiveDate },
}

struct DashboardInner {
    selection: SelectionStore,
    filters: FilterStore,
    picker: RangePicker,
    propagator: ChangePropagator,
    datasets: Datasets,
}

/// Single source of truth for the selection and filters.
///
/// Constructed once after the datasets are loaded and passed to whoever needs
/// it; cloning is cheap and every clone shares the same state. The `on_*`
/// methods are the only way to mutate it, and every effective change is
/// fanned out to the subscribed views.
#[derive(Clone)]
pub struct Dashboard {
    inner: Rc<RefCell<DashboardInner>>,
}

impl Dashboard {
    pub fn new(datasets: Datasets, config: &DashboardConfig) -> Self {
        let mut picker = RangePicker::new(config.picker_bounds);
        picker.sync(config.default_range);
        if !datasets.is_complete() {
            log::warn!("[EVA Debug] dashboard: starting with missing datasets, dependent views stay blank");
        }
        Dashboard {
            inner: Rc::new(RefCell::new(DashboardInner {
                selection: SelectionStore::new(Selection {
                    date_range: config.default_range,
                    region: None,
                }),
                filters: FilterStore::new(config.filters),
                picker,
                propagator: ChangePropagator::new(config.delivery()),
                datasets,
            })),
        }
    }

    pub fn selection(&self) -> Selection {
        self.inner.borrow().selection.selection().clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.inner.borrow().filters.filters()
    }

    pub fn datasets(&self) -> Datasets {
        self.inner.borrow().datasets.clone()
    }

    pub fn picker(&self) -> RangePicker {
        self.inner.borrow().picker
    }

    /// Number of fan-out cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.inner.borrow().propagator.cycles()
    }

    /// The current state with lazily computed aggregates.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.borrow();
        Snapshot::new(
            inner.selection.selection().clone(),
            inner.filters.filters(),
            inner.datasets.clone(),
        )
    }

    pub fn subscribe(&self, kind: ViewKind, view: Rc<RefCell<dyn View>>) -> SubscriptionId {
        self.inner.borrow_mut().propagator.subscribe(kind, view)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().propagator.unsubscribe(id)
    }

    /// New date range from the timeline. Not validated; an inverted range
    /// aggregates to nothing.
    pub fn on_date_range_changed(&self, start: YearMonth, end: YearMonth) {
        let range = DateRange::new(start, end);
        let changed = {
            let mut inner = self.inner.borrow_mut();
            inner.picker.sync(range);
            inner.selection.set_date_range(range)
        };
        log::debug!("[EVA Debug] dashboard: date range {} (changed: {})", range, changed);
        if changed {
            self.changed();
        }
    }

    /// `None` selects all regions.
    pub fn on_region_selected(&self, region: Option<Region>) {
        let changed = self.inner.borrow_mut().selection.set_region(region.clone());
        log::debug!("[EVA Debug] dashboard: region {:?} (changed: {})", region, changed);
        if changed {
            self.changed();
        }
    }

    pub fn on_filter_toggled(&self, key: FilterKey, value: bool) {
        let changed = self.inner.borrow_mut().filters.set_filter(key, value);
        log::debug!("[EVA Debug] dashboard: filter {}={} (changed: {})", key, value, changed);
        if changed {
            self.changed();
        }
    }

    /// Map click with deselect-on-second-click.
    pub fn on_region_clicked(&self, region: &str) {
        let next = toggle_region(self.inner.borrow().selection.region(), region);
        self.on_region_selected(next);
    }

    /// Start handle drag; ignored when the picker clamps it.
    pub fn on_drag_start(&self, date: NaiveDate) {
        let range = self.inner.borrow_mut().picker.drag_start(date);
        if let Some(range) = range {
            self.on_date_range_changed(range.start, range.end);
        }
    }

    /// End handle drag; ignored when the picker clamps it.
    pub fn on_drag_end(&self, date: NaiveDate) {
        let range = self.inner.borrow_mut().picker.drag_end(date);
        if let Some(range) = range {
            self.on_date_range_changed(range.start, range.end);
        }
    }

    pub fn apply(&self, interaction: Interaction) {
        match interaction {
            Interaction::DateRangeChanged { start, end } => self.on_date_range_changed(start, end),
            Interaction::RegionSelected { region } => self.on_region_selected(region),
            Interaction::RegionClicked { region } => self.on_region_clicked(&region),
            Interaction::FilterToggled { key, value } => self.on_filter_toggled(key, value),
            Interaction::DragStart { date } => self.on_drag_start(date),
            Interaction::DragEnd { date } => self.on_drag_end(date),
        }
    }

    /// Fan out the current state, whether or not anything changed (initial
    /// render).
    pub fn refresh(&self) {
        let notify = self.inner.borrow_mut().propagator.request();
        if notify == Notify::FanOut {
            self.propagate();
        }
    }

    /// Release a debounced fan-out once its window has elapsed. Returns
    /// whether a cycle ran.
    pub fn poll(&self, now: Instant) -> bool {
        let due = self.inner.borrow_mut().propagator.poll(now);
        if due {
            self.propagate();
        }
        due
    }

    fn changed(&self) {
        let notify = self.inner.borrow_mut().propagator.notify(Instant::now());
        match notify {
            Notify::FanOut => self.propagate(),
            Notify::Deferred => log::debug!("[EVA Debug] dashboard: change deferred to next cycle"),
            Notify::Scheduled => {}
        }
    }

    /// Run cycles until no view raised further changes.
    fn propagate(&self) {
        loop {
            let (subscribers, snapshot) = {
                let mut inner = self.inner.borrow_mut();
                let subscribers = inner.propagator.begin_cycle();
                let snapshot = Snapshot::new(
                    inner.selection.selection().clone(),
                    inner.filters.filters(),
                    inner.datasets.clone(),
                );
                (subscribers, snapshot)
            };
            log::debug!(
                "[EVA Debug] dashboard: fan-out to {} views over {}",
                subscribers.len(),
                snapshot.selection.date_range
            );
            for subscriber in &subscribers {
                subscriber
                    .view
                    .borrow_mut()
                    .on_selection_changed(&snapshot, self);
            }
            let again = self.inner.borrow_mut().propagator.end_cycle();
            if !again {
                break;
            }
        }
    }
}
