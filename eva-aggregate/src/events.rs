//! Dated-event aggregation, shared by charging stations and incentives.

use crate::models::{DatePoint, RegionCounts, StationMarker};
use eva_data::date_range::{DateRange, YearMonth};
use eva_data::events::{Dated, RegionEvents};
use eva_data::station::StationDataset;
use std::collections::BTreeMap;

/// Events per month over `[range.start, range.end)`.
///
/// Unlike the sales curves these are plain per-month counts, not running
/// totals. One point is emitted for every month of the range that lies
/// within the dataset's span (first to last event over all regions), empty
/// months counting zero. A range outside that span, or an empty dataset,
/// yields an empty sequence; an unknown region yields all zeros.
pub fn aggregate_events_by_month<T: Dated>(
    range: &DateRange,
    region: Option<&str>,
    events: &RegionEvents<T>,
) -> Vec<DatePoint> {
    let Some(coverage) = events.coverage() else {
        return Vec::new();
    };
    let window = range.intersect(&coverage);
    let mut buckets: BTreeMap<YearMonth, u64> = window.months().map(|m| (m, 0)).collect();
    if buckets.is_empty() {
        return Vec::new();
    }
    for event in events.scoped(region) {
        if let Some(count) = buckets.get_mut(&YearMonth::from_date(&event.date())) {
            *count += 1;
        }
    }
    log::debug!(
        "[EVA Debug] aggregate: events by month over {} produced {} points",
        range,
        buckets.len()
    );
    buckets
        .into_iter()
        .map(|(date, count)| DatePoint {
            date,
            value: count as f64,
        })
        .collect()
}

/// Number of events per region inside the range. Every region of the
/// dataset is listed, with zero when nothing falls in the range.
pub fn count_by_region<T: Dated>(range: &DateRange, events: &RegionEvents<T>) -> RegionCounts {
    events
        .by_region
        .iter()
        .map(|(region, records)| {
            let count = records
                .iter()
                .filter(|r| range.contains_date(&r.date()))
                .count() as u64;
            (region.clone(), count)
        })
        .collect()
}

/// Stations of one region opened inside the range, in opening order.
/// Stations without coordinates cannot be plotted and are left out.
pub fn stations_in_range(
    range: &DateRange,
    region: &str,
    stations: &StationDataset,
) -> Vec<StationMarker> {
    let mut markers: Vec<StationMarker> = stations
        .region(region)
        .iter()
        .filter(|s| range.contains_date(&s.open_date))
        .filter_map(|s| {
            let (latitude, longitude) = s.coordinates()?;
            Some(StationMarker {
                region: region.to_string(),
                open_date: s.open_date,
                latitude,
                longitude,
            })
        })
        .collect();
    markers.sort_by_key(|m| m.open_date);
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_data::loader::load_stations;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month - 1).unwrap()
    }

    fn range(start: (i32, u32), end: (i32, u32)) -> DateRange {
        DateRange::new(ym(start.0, start.1), ym(end.0, end.1))
    }

    /// Helper to create a station dataset spanning 2016-01 .. 2016-06.
    fn sample_stations() -> StationDataset {
        load_stations(
            r#"{
            "California": [
                {"Open Date": "2016-01-01", "Latitude": 34.0, "Longitude": -118.0},
                {"Open Date": "2016-01-31", "Latitude": 34.1, "Longitude": -118.1},
                {"Open Date": "2016-03-15"},
                {"Open Date": "2016-06-30", "Latitude": 34.2, "Longitude": -118.2}
            ],
            "Nevada": [
                {"Open Date": "2016-02-10", "Latitude": 36.1, "Longitude": -115.1},
                {"Open Date": "2016-04-01", "Latitude": 36.2, "Longitude": -115.2}
            ]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn monthly_counts_are_not_cumulative() {
        let stations = sample_stations();
        let points = aggregate_events_by_month(&range((2016, 1), (2016, 7)), None, &stations);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![2.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
        assert_eq!(points[0].date, ym(2016, 1));
        assert_eq!(points[5].date, ym(2016, 6));
    }

    #[test]
    fn single_region_counts() {
        let stations = sample_stations();
        let points = aggregate_events_by_month(&range((2016, 1), (2016, 5)), Some("Nevada"), &stations);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn unknown_region_is_all_zero() {
        let stations = sample_stations();
        let points = aggregate_events_by_month(&range((2016, 1), (2016, 3)), Some("Atlantis"), &stations);
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.value == 0.0));
        let counts = count_by_region(&range((2016, 1), (2016, 3)), &stations);
        assert_eq!(counts.get("Atlantis"), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn range_outside_coverage_is_empty() {
        let stations = sample_stations();
        assert!(aggregate_events_by_month(&DateRange::years(2020, 2021), None, &stations).is_empty());
        assert!(aggregate_events_by_month(&range((2016, 3), (2016, 3)), None, &stations).is_empty());
        let empty = StationDataset::default();
        assert!(aggregate_events_by_month(&DateRange::years(2016, 2016), None, &empty).is_empty());
        assert!(count_by_region(&DateRange::years(2016, 2016), &empty).is_empty());
    }

    #[test]
    fn series_is_clipped_to_coverage() {
        let stations = sample_stations();
        let points = aggregate_events_by_month(&DateRange::years(2015, 2017), None, &stations);
        assert_eq!(points.len(), 6);
        assert_eq!(points.first().unwrap().date, ym(2016, 1));
        assert_eq!(points.last().unwrap().date, ym(2016, 6));
    }

    #[test]
    fn counts_respect_half_open_bounds() {
        let stations = sample_stations();
        // Nevada's 2016-04-01 station sits exactly on the end bound
        let counts = count_by_region(&range((2016, 2), (2016, 4)), &stations);
        assert_eq!(counts["Nevada"], 1);
        assert_eq!(counts["California"], 1);
        let counts = count_by_region(&range((2016, 4), (2016, 5)), &stations);
        assert_eq!(counts["Nevada"], 1);
        assert_eq!(counts["California"], 0);
    }

    #[test]
    fn boundary_sweep_over_every_month() {
        let stations = sample_stations();
        let coverage = stations.coverage().unwrap();
        for month in coverage.months() {
            let day_one = month.first_day().unwrap();
            let starting_here = DateRange::new(month, month.succ());
            let ending_here = DateRange::new(YearMonth::january(2015), month);
            assert!(starting_here.contains_date(&day_one));
            assert!(!ending_here.contains_date(&day_one));

            let inside: u64 = count_by_region(&starting_here, &stations).values().sum();
            let monthly = aggregate_events_by_month(&starting_here, None, &stations);
            assert_eq!(monthly.len(), 1);
            assert_eq!(monthly[0].value as u64, inside);
        }
    }

    #[test]
    fn station_markers_need_coordinates() {
        let stations = sample_stations();
        let markers = stations_in_range(&range((2016, 1), (2016, 7)), "California", &stations);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].latitude, 34.0);
        assert!(markers.iter().all(|m| m.region == "California"));
        assert!(stations_in_range(&range((2016, 1), (2016, 7)), "Atlantis", &stations).is_empty());
        let markers = stations_in_range(&range((2016, 1), (2016, 6)), "California", &stations);
        assert_eq!(markers.len(), 2, "June opening is past the end bound");
    }
}
