//! The filter checklist state.

pub use eva_aggregate::filters::{FilterKey, FilterSet};

/// Holds the active display toggles and keeps individual powertrains and
/// aggregate mode mutually exclusive.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    filters: FilterSet,
}

impl FilterStore {
    /// Start from `initial`, resolving a conflicting set in favour of the
    /// individual powertrains.
    pub fn new(initial: FilterSet) -> Self {
        let mut filters = initial;
        if !filters.is_consistent() {
            log::warn!("[EVA Debug] filters: initial set enables aggregate and powertrains, dropping aggregate");
            filters.aggregate_sales = false;
        }
        FilterStore { filters }
    }

    /// A copy of the current flags.
    pub fn filters(&self) -> FilterSet {
        self.filters
    }

    pub fn get(&self, key: FilterKey) -> bool {
        self.filters.get(key)
    }

    /// Apply one toggle. Turning aggregate mode on clears the three
    /// powertrains; turning a powertrain on clears aggregate mode. Any other
    /// change touches only `key`.
    ///
    /// Returns whether the set changed.
    pub fn set_filter(&mut self, key: FilterKey, value: bool) -> bool {
        let before = self.filters;
        let mut next = before;
        if value && key == FilterKey::AggregateSales {
            next.ev_sales = false;
            next.hev_sales = false;
            next.phev_sales = false;
        } else if value && key.is_powertrain() {
            next.aggregate_sales = false;
        }
        self.filters = next.with(key, value);
        debug_assert!(self.filters.is_consistent());
        before != self.filters
    }
}
