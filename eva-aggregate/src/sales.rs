//! Sales aggregation: pro-rated totals per region and cumulative monthly curves.
//!
//! Sales are only known per calendar year. A month's share of a year is
//! `annual / 12`, and every rounding happens on a single year's contribution
//! before any summing, so results match the dashboard's historical numbers
//! to the unit.

use crate::models::{AggregatedSeries, DatePoint, RegionTotals, SalesByRegion, SeriesCategory};
use eva_data::date_range::DateRange;
use eva_data::sales::{SalesDataset, SalesRow, SalesTable};
use std::collections::BTreeMap;

/// Pro-rated sales per region over `[range.start, range.end)`.
///
/// A year entirely inside the range contributes its annual value as is. A
/// boundary year contributes `round(annual / 12 * months)`, `months` being
/// the number of its months whose first day lies in the range (the month of
/// `range.end` is never counted). Malformed cells contribute zero and a
/// zero-width range gives zero for every region.
pub fn aggregate_sales_by_region(range: &DateRange, table: &SalesTable) -> RegionTotals {
    let mut totals = RegionTotals::new();
    for row in &table.rows {
        let total = if range.is_empty() {
            0.0
        } else {
            (range.start.year..=range.end.year)
                .map(|year| prorated_year(row, year, range.months_in_year(year)))
                .sum()
        };
        *totals.entry(row.state.clone()).or_insert(0.0) += total;
    }
    log::debug!(
        "[EVA Debug] aggregate: {} sales by region over {} for {} regions",
        table.powertrain,
        range,
        totals.len()
    );
    totals
}

fn prorated_year(row: &SalesRow, year: i32, months: u32) -> f64 {
    let Some(annual) = row.annual(year) else {
        return 0.0;
    };
    match months {
        0 => 0.0,
        12 => annual,
        m => (annual / 12.0 * m as f64).round(),
    }
}

/// [`aggregate_sales_by_region`] for the three powertrains at once.
pub fn sales_by_region_all(range: &DateRange, sales: &SalesDataset) -> SalesByRegion {
    SalesByRegion {
        bev: aggregate_sales_by_region(range, &sales.bev),
        hev: aggregate_sales_by_region(range, &sales.hev),
        phev: aggregate_sales_by_region(range, &sales.phev),
    }
}

/// Cumulative monthly sales curves, one per powertrain.
///
/// Each month adds `round(annual / 12)` per row (summed over every region
/// when `region` is `None`), and the value at month M is the running total
/// from `range.start` through M. The curves plot cumulative adoption, unlike
/// the station and incentive lines which are per-month counts.
///
/// Only months whose year is a column of the table are emitted; a region
/// missing from a table yields an empty curve for that powertrain.
pub fn aggregate_sales_by_month(
    range: &DateRange,
    region: Option<&str>,
    sales: &SalesDataset,
) -> AggregatedSeries {
    let mut series = AggregatedSeries::new();
    for table in sales.tables() {
        series.insert(
            SeriesCategory::for_powertrain(table.powertrain),
            sales_series_by_month(range, region, table),
        );
    }
    series
}

/// The cumulative monthly curve of a single powertrain table.
pub fn sales_series_by_month(
    range: &DateRange,
    region: Option<&str>,
    table: &SalesTable,
) -> Vec<DatePoint> {
    let rows = scoped_rows(table, region);
    if rows.is_empty() {
        return Vec::new();
    }
    let monthly = monthly_share_by_year(range, table, &rows);
    let points = accumulate(range, |year| monthly.get(&year).copied());
    log::debug!(
        "[EVA Debug] aggregate: {} sales by month over {} produced {} points",
        table.powertrain,
        range,
        points.len()
    );
    points
}

/// Cumulative monthly curve of the three powertrains added together.
///
/// A month is emitted when at least one table covers its year; tables that
/// do not cover it add nothing that month.
pub fn combined_sales_series_by_month(
    range: &DateRange,
    region: Option<&str>,
    sales: &SalesDataset,
) -> Vec<DatePoint> {
    let mut monthly: BTreeMap<i32, f64> = BTreeMap::new();
    let mut any_rows = false;
    for table in sales.tables() {
        let rows = scoped_rows(table, region);
        any_rows |= !rows.is_empty();
        for (year, share) in monthly_share_by_year(range, table, &rows) {
            *monthly.entry(year).or_insert(0.0) += share;
        }
    }
    if !any_rows {
        return Vec::new();
    }
    accumulate(range, |year| monthly.get(&year).copied())
}

fn scoped_rows<'a>(table: &'a SalesTable, region: Option<&str>) -> Vec<&'a SalesRow> {
    match region {
        Some(region) => table.rows.iter().filter(|row| row.state == region).collect(),
        None => table.rows.iter().collect(),
    }
}

/// Per covered year of the range: the sum over `rows` of `round(annual / 12)`.
fn monthly_share_by_year(
    range: &DateRange,
    table: &SalesTable,
    rows: &[&SalesRow],
) -> BTreeMap<i32, f64> {
    if range.is_empty() {
        return BTreeMap::new();
    }
    (range.start.year..=range.end.year)
        .filter(|year| table.covers_year(*year))
        .map(|year| {
            let share = rows
                .iter()
                .map(|row| row.annual(year).map(|a| (a / 12.0).round()).unwrap_or(0.0))
                .sum();
            (year, share)
        })
        .collect()
}

/// Running total over the months of `range`; months whose year has no share are skipped.
fn accumulate(range: &DateRange, share: impl Fn(i32) -> Option<f64>) -> Vec<DatePoint> {
    let mut cumulative = 0.0;
    range
        .months()
        .filter_map(|month| {
            let value = share(month.year)?;
            cumulative += value;
            Some(DatePoint {
                date: month,
                value: cumulative,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_data::date_range::YearMonth;
    use eva_data::sales::Powertrain;
    use eva_data::loader::load_sales_table;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month - 1).unwrap()
    }

    fn range(start: (i32, u32), end: (i32, u32)) -> DateRange {
        DateRange::new(ym(start.0, start.1), ym(end.0, end.1))
    }

    /// Helper to create a sales dataset with a few states.
    fn sample_sales() -> SalesDataset {
        let bev = "\
stateName,2016,2017,2018
California,1200,2400,3600
Ohio,120,oops,360
Texas,600,1200,1800
";
        let hev = "\
stateName,2016,2017,2018
California,240,240,240
Ohio,12,12,12
";
        let phev = "\
stateName,2016,2017
California,60,120
";
        SalesDataset {
            bev: load_sales_table(Powertrain::Bev, bev).unwrap(),
            hev: load_sales_table(Powertrain::Hev, hev).unwrap(),
            phev: load_sales_table(Powertrain::Phev, phev).unwrap(),
        }
    }

    // ───────────────────── by region ─────────────────────

    #[test]
    fn first_quarter_is_prorated() {
        let sales = sample_sales();
        let totals = aggregate_sales_by_region(&range((2016, 1), (2016, 4)), &sales.bev);
        // round(1200 / 12 * 3)
        assert_eq!(totals["California"], 300.0);
        assert_eq!(totals["Ohio"], 30.0);
        assert_eq!(totals["Texas"], 150.0);
    }

    #[test]
    fn zero_width_range_gives_zeros() {
        let sales = sample_sales();
        let totals = aggregate_sales_by_region(&range((2017, 1), (2017, 1)), &sales.bev);
        assert_eq!(totals.len(), 3);
        assert!(totals.values().all(|v| *v == 0.0));
    }

    #[test]
    fn inverted_range_gives_zeros() {
        let sales = sample_sales();
        let totals = aggregate_sales_by_region(&range((2018, 1), (2017, 1)), &sales.bev);
        assert!(totals.values().all(|v| *v == 0.0));
    }

    #[test]
    fn full_calendar_year_is_unmodified() {
        let sales = sample_sales();
        let totals = aggregate_sales_by_region(&DateRange::years(2018, 2018), &sales.bev);
        assert_eq!(totals["California"], 3600.0);
        assert_eq!(totals["Ohio"], 360.0);
    }

    #[test]
    fn full_year_keeps_fractions() {
        let table = load_sales_table(Powertrain::Bev, "stateName,2016\nMaine,100.4\n").unwrap();
        let totals = aggregate_sales_by_region(&DateRange::years(2016, 2016), &table);
        assert_eq!(totals["Maine"], 100.4);
    }

    #[test]
    fn boundary_years_round_separately() {
        // 100 / 12 * 1 = 8.33 -> 8, twice; rounding the sum would give 17
        let table = load_sales_table(Powertrain::Bev, "stateName,2016,2017\nIowa,100,100\n").unwrap();
        let totals = aggregate_sales_by_region(&range((2016, 12), (2017, 2)), &table);
        assert_eq!(totals["Iowa"], 16.0);
    }

    #[test]
    fn spanning_years_sum_partial_and_full() {
        let sales = sample_sales();
        // 2016: Oct..Dec = 3 months, 2017 full, 2018: Jan..Feb = 2 months
        let totals = aggregate_sales_by_region(&range((2016, 10), (2018, 3)), &sales.bev);
        assert_eq!(totals["California"], 300.0 + 2400.0 + 600.0);
        // Ohio's 2017 cell is malformed and contributes nothing
        assert_eq!(totals["Ohio"], 30.0 + 0.0 + 60.0);
    }

    #[test]
    fn years_outside_the_table_contribute_nothing() {
        let sales = sample_sales();
        let totals = aggregate_sales_by_region(&DateRange::years(2010, 2012), &sales.bev);
        assert!(totals.values().all(|v| *v == 0.0));
    }

    #[test]
    fn all_powertrains_at_once() {
        let sales = sample_sales();
        let all = sales_by_region_all(&DateRange::years(2016, 2016), &sales);
        assert_eq!(all.get(Powertrain::Bev, "California"), 1200.0);
        assert_eq!(all.get(Powertrain::Hev, "California"), 240.0);
        assert_eq!(all.get(Powertrain::Phev, "California"), 60.0);
        assert_eq!(all.get(Powertrain::Phev, "Texas"), 0.0);
        assert_eq!(all.combined("California"), 1500.0);
    }

    // ───────────────────── by month ─────────────────────

    #[test]
    fn single_state_curve_is_cumulative() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&range((2016, 1), (2016, 4)), Some("California"), &sales);
        let ev = &series[&SeriesCategory::Ev];
        assert_eq!(ev.len(), 3);
        assert_eq!(ev[0], DatePoint { date: ym(2016, 1), value: 100.0 });
        assert_eq!(ev[1], DatePoint { date: ym(2016, 2), value: 200.0 });
        assert_eq!(ev[2], DatePoint { date: ym(2016, 3), value: 300.0 });
        let hev = &series[&SeriesCategory::Hev];
        assert_eq!(hev.last().unwrap().value, 60.0);
    }

    #[test]
    fn all_states_sum_rounded_shares() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&range((2016, 1), (2016, 3)), None, &sales);
        let ev = &series[&SeriesCategory::Ev];
        // 100 + 10 + 50 per month
        assert_eq!(ev[0].value, 160.0);
        assert_eq!(ev[1].value, 320.0);
    }

    #[test]
    fn end_month_is_excluded() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&range((2016, 11), (2017, 2)), Some("Texas"), &sales);
        let ev = &series[&SeriesCategory::Ev];
        let dates: Vec<YearMonth> = ev.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![ym(2016, 11), ym(2016, 12), ym(2017, 1)]);
        assert_eq!(ev[2].value, 50.0 + 50.0 + 100.0);
    }

    #[test]
    fn curve_is_monotonic_across_years() {
        let sales = sample_sales();
        for region in [None, Some("California"), Some("Ohio")] {
            let series = aggregate_sales_by_month(&DateRange::years(2016, 2018), region, &sales);
            for points in series.values() {
                for pair in points.windows(2) {
                    assert!(pair[1].value >= pair[0].value, "{:?} decreased", region);
                }
            }
        }
    }

    #[test]
    fn malformed_year_still_yields_points() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&DateRange::years(2017, 2017), Some("Ohio"), &sales);
        let ev = &series[&SeriesCategory::Ev];
        assert_eq!(ev.len(), 12);
        assert!(ev.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn missing_region_gives_empty_curve() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&DateRange::years(2016, 2016), Some("Texas"), &sales);
        assert_eq!(series[&SeriesCategory::Ev].len(), 12);
        assert!(series[&SeriesCategory::Hev].is_empty());
        assert!(series[&SeriesCategory::Phev].is_empty());

        let series = aggregate_sales_by_month(&DateRange::years(2016, 2016), Some("Atlantis"), &sales);
        assert!(series.values().all(Vec::is_empty));
    }

    #[test]
    fn range_outside_coverage_is_empty() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&DateRange::years(2030, 2031), None, &sales);
        assert!(series.values().all(Vec::is_empty));
    }

    #[test]
    fn partial_coverage_stops_at_last_column() {
        let sales = sample_sales();
        let series = aggregate_sales_by_month(&DateRange::years(2017, 2018), Some("California"), &sales);
        assert_eq!(series[&SeriesCategory::Ev].len(), 24);
        assert_eq!(series[&SeriesCategory::Phev].len(), 12, "PHEV table ends in 2017");
    }

    #[test]
    fn combined_curve_adds_powertrains() {
        let sales = sample_sales();
        let combined =
            combined_sales_series_by_month(&range((2016, 1), (2016, 3)), Some("California"), &sales);
        // 100 + 20 + 5 per month
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].value, 125.0);
        assert_eq!(combined[1].value, 250.0);

        let combined = combined_sales_series_by_month(&DateRange::years(2018, 2018), Some("California"), &sales);
        // PHEV has no 2018 column; BEV 300 + HEV 20
        assert_eq!(combined[0].value, 320.0);

        assert!(combined_sales_series_by_month(&DateRange::years(2016, 2016), Some("Atlantis"), &sales).is_empty());
    }
}
