use crate::date_range::{DateRange, YearMonth};
use crate::Region;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Anything with a single calendar date: station openings, incentive enactments.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Dated records grouped by region, as delivered by the JSON datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEvents<T> {
    pub by_region: BTreeMap<Region, Vec<T>>,
}

impl<T> Default for RegionEvents<T> {
    fn default() -> Self {
        RegionEvents {
            by_region: BTreeMap::new(),
        }
    }
}

impl<T: Dated> RegionEvents<T> {
    pub fn new(by_region: BTreeMap<Region, Vec<T>>) -> Self {
        RegionEvents { by_region }
    }

    /// Records for `region`; an unknown region is an empty slice.
    pub fn region(&self, region: &str) -> &[T] {
        self.by_region.get(region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.by_region.keys().map(String::as_str)
    }

    /// Records of one region, or of every region when `region` is `None`.
    pub fn scoped<'a>(&'a self, region: Option<&'a str>) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        match region {
            Some(region) => Box::new(self.region(region).iter()),
            None => Box::new(self.by_region.values().flatten()),
        }
    }

    /// Months spanned by the dataset, from the earliest to the latest record
    /// (both included). `None` when the dataset holds no record.
    pub fn coverage(&self) -> Option<DateRange> {
        let mut dates = self.by_region.values().flatten().map(Dated::date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(DateRange::new(
            YearMonth::from_date(&min),
            YearMonth::from_date(&max).succ(),
        ))
    }

    pub fn len(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
