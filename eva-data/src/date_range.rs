use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, indexed `0..=11` within its year.
///
/// This is the only month key used by the aggregation layer; month names are
/// produced at render time by `eva_utils::months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month0: u32,
}

impl YearMonth {
    /// Returns `None` when `month0` is not in `0..=11`.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        (month0 < 12).then_some(YearMonth { year, month0 })
    }

    /// The month containing `date`.
    pub fn from_date(date: &NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// January of `year`.
    pub fn january(year: i32) -> Self {
        YearMonth { year, month0: 0 }
    }

    /// First day of the month, `None` only outside chrono's supported years.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
    }

    /// The following month.
    pub fn succ(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &YearMonth) -> i64 {
        other.index() - self.index()
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + self.month0 as i64
    }

    fn from_index(index: i64) -> Self {
        YearMonth {
            year: index.div_euclid(12) as i32,
            month0: index.rem_euclid(12) as u32,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    /// Accepts "YYYY-MM" or any full date understood by
    /// `eva_utils::dates::parse_any_date` (the day is dropped).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((year, month)) = s.split_once('-') {
            if !month.contains('-') {
                let year: i32 = year.parse().map_err(|_| format!("bad year in {:?}", s))?;
                let month: u32 = month.parse().map_err(|_| format!("bad month in {:?}", s))?;
                return month
                    .checked_sub(1)
                    .and_then(|m0| YearMonth::new(year, m0))
                    .ok_or_else(|| format!("month out of range in {:?}", s));
            }
        }
        eva_utils::dates::parse_any_date(s)
            .map(|date| YearMonth::from_date(&date))
            .map_err(|e| e.to_string())
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A half-open month range `[start, end)`.
///
/// A record dated in month M belongs to the range iff `start <= M < end`.
/// Nothing prevents `start >= end`; such a range simply contains no month.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: YearMonth,
    pub end: YearMonth,
}

impl DateRange {
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        DateRange { start, end }
    }

    /// Build a range from two dates, truncating both to their month.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: YearMonth::from_date(&start),
            end: YearMonth::from_date(&end),
        }
    }

    /// The whole of `[first_year, last_year]` as calendar years.
    pub fn years(first_year: i32, last_year: i32) -> Self {
        DateRange {
            start: YearMonth::january(first_year),
            end: YearMonth::january(last_year + 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of months in the range, zero when empty.
    pub fn len(&self) -> usize {
        self.start.months_until(&self.end).max(0) as usize
    }

    pub fn contains_month(&self, month: &YearMonth) -> bool {
        self.start <= *month && *month < self.end
    }

    /// Because both bounds sit on day 1, comparing months is the same as
    /// comparing `start <= date < end` on full dates.
    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.contains_month(&YearMonth::from_date(date))
    }

    /// How many months of calendar `year` fall inside the range.
    pub fn months_in_year(&self, year: i32) -> u32 {
        let year_range = DateRange::years(year, year);
        self.intersect(&year_range).len() as u32
    }

    /// Overlap of two ranges (possibly empty).
    pub fn intersect(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        }
    }

    /// Iterate over every month of the range in ascending order.
    pub fn months(&self) -> Months {
        Months {
            next: self.start,
            end: self.end,
        }
    }
}

impl Default for DateRange {
    /// `[2016-01, 2024-01)`, the span covered by the bundled datasets.
    fn default() -> Self {
        DateRange::years(2016, 2023)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Month iterator over a half-open range.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct Months {
    next: YearMonth,
    end: YearMonth,
}

impl Iterator for Months {
    type Item = YearMonth;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.end {
            let current = self.next;
            self.next = current.succ();
            Some(current)
        } else {
            None
        }
    }
}
