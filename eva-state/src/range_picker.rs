//! Timeline handle logic.
//!
//! The selection store accepts any range; this is the component that keeps
//! what it sends ordered and inside the dataset span.

use chrono::NaiveDate;
use eva_data::date_range::{DateRange, YearMonth};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePicker {
    bounds: DateRange,
    current: DateRange,
}

impl RangePicker {
    /// A picker spanning `bounds` with the whole span selected.
    pub fn new(bounds: DateRange) -> Self {
        RangePicker {
            bounds,
            current: bounds,
        }
    }

    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub fn current(&self) -> DateRange {
        self.current
    }

    /// Re-sync with a range set elsewhere (e.g. a replayed interaction).
    pub fn sync(&mut self, range: DateRange) {
        self.current = range;
    }

    /// Move the start handle to the month containing `date`.
    ///
    /// Accepted only when `bounds.start <= start < current.end`; otherwise the
    /// gesture is clamped and `None` is returned.
    pub fn drag_start(&mut self, date: NaiveDate) -> Option<DateRange> {
        let start = YearMonth::from_date(&date);
        if start < self.bounds.start || start >= self.current.end {
            log::debug!("[EVA Debug] picker: start {} clamped", start);
            return None;
        }
        self.current.start = start;
        Some(self.current)
    }

    /// Move the end handle to the month containing `date`.
    ///
    /// Accepted only when `current.start < end <= bounds.end`.
    pub fn drag_end(&mut self, date: NaiveDate) -> Option<DateRange> {
        let end = YearMonth::from_date(&date);
        if end <= self.current.start || end > self.bounds.end {
            log::debug!("[EVA Debug] picker: end {} clamped", end);
            return None;
        }
        self.current.end = end;
        Some(self.current)
    }
}

impl Default for RangePicker {
    fn default() -> Self {
        RangePicker::new(DateRange::default())
    }
}
