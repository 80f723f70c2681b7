//! Terminal renderers for the view models.

use eva_aggregate::models::RegionSummary;
use eva_data::date_range::{DateRange, YearMonth};
use eva_data::incentive::IncentiveRecord;
use eva_state::view::{ChartModel, FiltersModel, ListModel, MapModel, RenderModel};
use eva_state::{FilterKey, IncentiveList};
use eva_utils::dates::{format_date, format_date_short};
use eva_utils::months::{month_label, Locale};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render one model in the requested format, without a trailing newline.
pub fn render(model: &RenderModel, format: OutputFormat, locale: Locale) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(model)?),
        OutputFormat::Text => Ok(render_text(model, locale)),
    }
}

pub fn render_text(model: &RenderModel, locale: Locale) -> String {
    match model {
        RenderModel::Map(map) => map_text(map, locale),
        RenderModel::Chart(chart) => chart_text(chart, locale),
        RenderModel::List(list) => list_text(list, locale),
        RenderModel::Filters(filters) => filters_text(filters),
    }
}

fn month(m: &YearMonth, locale: Locale) -> String {
    month_label(m.year, m.month0, locale)
}

/// "Jan 2016 to Mar 2016" for `[2016-01, 2016-04)`.
fn range_label(range: &DateRange, locale: Locale) -> String {
    if range.is_empty() {
        return format!("empty range {}", range);
    }
    let last = range.months().last().unwrap_or(range.start);
    format!("{} to {}", month(&range.start, locale), month(&last, locale))
}

fn region_label(region: Option<&str>) -> &str {
    region.unwrap_or("all regions")
}

fn summary_line(summary: &RegionSummary) -> String {
    let mut line = format!("{:<24}", summary.region);
    let sales = [
        ("EV", summary.ev_sales),
        ("HEV", summary.hev_sales),
        ("PHEV", summary.phev_sales),
        ("All sales", summary.all_sales),
    ];
    for (label, value) in sales {
        if let Some(value) = value {
            let _ = write!(line, "  {}: {}", label, value);
        }
    }
    if let Some(stations) = summary.stations {
        let _ = write!(line, "  Charging stations: {}", stations);
    }
    if let Some(incentives) = summary.incentives {
        let _ = write!(line, "  Incentives: {}", incentives);
    }
    line
}

fn map_text(map: &MapModel, locale: Locale) -> String {
    let mut out = format!(
        "== Map: {} ({})",
        range_label(&map.date_range, locale),
        region_label(map.selected_region.as_deref())
    );
    for summary in &map.regions {
        let _ = write!(out, "\n  {}", summary_line(summary));
    }
    if let Some(region) = &map.selected_region {
        let _ = write!(out, "\n  Stations in {}: {}", region, map.stations.len());
        for marker in &map.stations {
            let _ = write!(
                out,
                "\n    {}  {:.4}, {:.4}",
                format_date(&marker.open_date),
                marker.latitude,
                marker.longitude
            );
        }
    }
    out
}

fn chart_text(chart: &ChartModel, locale: Locale) -> String {
    let mut out = format!(
        "== Chart: {} ({})",
        range_label(&chart.date_range, locale),
        region_label(chart.region.as_deref())
    );
    for (category, points) in &chart.series {
        let kind = if category.is_cumulative() { "cumulative" } else { "per month" };
        let _ = write!(out, "\n  {} ({})", category, kind);
        if points.is_empty() {
            out.push_str("\n    no data");
        }
        for point in points {
            let _ = write!(out, "\n    {:<16}{}", month(&point.date, locale), point.value);
        }
    }
    out
}

fn incentive_line(incentive: &IncentiveRecord) -> String {
    let types: Vec<String> = incentive.types_supported.iter().map(|p| p.to_string()).collect();
    let mut line = format!(
        "{}  [{}] {}",
        format_date_short(&incentive.date),
        incentive.category,
        incentive.project_name
    );
    if !types.is_empty() {
        let _ = write!(line, " ({})", types.join(", "));
    }
    line
}

fn list_text(list: &ListModel, locale: Locale) -> String {
    let mut out = format!("== Incentives: {}", range_label(&list.date_range, locale));
    match &list.incentives {
        None => out.push_str("\n  unavailable"),
        Some(IncentiveList::Region { region, incentives }) => {
            let _ = write!(out, "\n  {}", region);
            for incentive in incentives {
                let _ = write!(out, "\n    {}", incentive_line(incentive));
            }
        }
        Some(IncentiveList::AllRegions { groups }) => {
            for (region, incentives) in groups {
                let _ = write!(out, "\n  {}", region);
                for incentive in incentives {
                    let _ = write!(out, "\n    {}", incentive_line(incentive));
                }
            }
        }
    }
    if list.incentives.as_ref().is_some_and(|l| l.is_empty()) {
        out.push_str("\n  none in range");
    }
    out
}

fn filters_text(model: &FiltersModel) -> String {
    let flags: Vec<String> = FilterKey::ALL
        .iter()
        .map(|key| {
            let mark = if model.filters.get(*key) { 'x' } else { ' ' };
            format!("[{}] {}", mark, key)
        })
        .collect();
    format!("== Filters: {}", flags.join(" "))
}
