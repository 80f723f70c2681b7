//! The current date range and region.

use eva_data::date_range::{DateRange, YearMonth};
use eva_data::Region;
use serde::{Deserialize, Serialize};

/// What the user is looking at. `region: None` means all regions together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub date_range: DateRange,
    pub region: Option<Region>,
}

/// Passive holder of the [`Selection`].
///
/// Nothing is validated here: an inverted range is stored as given and
/// simply aggregates to nothing. Keeping gestures ordered is the range
/// picker's job (see [`crate::range_picker::RangePicker`]).
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selection: Selection,
}

impl SelectionStore {
    pub fn new(selection: Selection) -> Self {
        SelectionStore { selection }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn date_range(&self) -> DateRange {
        self.selection.date_range
    }

    pub fn start(&self) -> YearMonth {
        self.selection.date_range.start
    }

    pub fn end(&self) -> YearMonth {
        self.selection.date_range.end
    }

    pub fn region(&self) -> Option<&str> {
        self.selection.region.as_deref()
    }

    /// Each setter returns whether the stored value changed.
    pub fn set_start(&mut self, start: YearMonth) -> bool {
        replace(&mut self.selection.date_range.start, start)
    }

    pub fn set_end(&mut self, end: YearMonth) -> bool {
        replace(&mut self.selection.date_range.end, end)
    }

    pub fn set_date_range(&mut self, range: DateRange) -> bool {
        replace(&mut self.selection.date_range, range)
    }

    pub fn set_region(&mut self, region: Option<Region>) -> bool {
        replace(&mut self.selection.region, region)
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_span_and_all_regions() {
        let store = SelectionStore::default();
        assert_eq!(store.date_range(), DateRange::years(2016, 2023));
        assert_eq!(store.region(), None);
    }

    #[test]
    fn setters_report_changes() {
        let mut store = SelectionStore::default();
        assert!(store.set_region(Some("Ohio".to_string())));
        assert!(!store.set_region(Some("Ohio".to_string())));
        assert_eq!(store.region(), Some("Ohio"));
        assert!(store.set_region(None));

        assert!(store.set_start(YearMonth::january(2018)));
        assert!(!store.set_date_range(DateRange::new(YearMonth::january(2018), YearMonth::january(2024))));
        assert!(store.set_end(YearMonth::january(2020)));
        assert_eq!(store.date_range(), DateRange::years(2018, 2019));
    }

    #[test]
    fn inverted_range_is_stored_as_given() {
        let mut store = SelectionStore::default();
        let inverted = DateRange::new(YearMonth::january(2020), YearMonth::january(2019));
        assert!(store.set_date_range(inverted));
        assert_eq!(store.date_range(), inverted);
        assert!(store.date_range().is_empty());
    }
}
