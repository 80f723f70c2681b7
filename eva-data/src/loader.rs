//! Text loaders turning the raw dataset files into records.
//!
//! Each loader parses a string slice; fetching the bytes (files, URLs,
//! gzip) is the caller's job.
//!
//! # Formats
//!
//! - **Sales** (CSV, has headers): `stateName,2016,2017,...` with one numeric
//!   column per calendar year. Non-year columns other than `stateName` are ignored.
//! - **Stations** (JSON): `{ "<state>": [ { "Open Date", "Latitude", "Longitude", ... } ] }`
//! - **Incentives** (JSON): `{ "<state>": [ { "Date", "Category", "Project Name", "Types Supported" } ] }`

use crate::error::{LoadError, Result};
use crate::incentive::{parse_types_supported, IncentiveCategory, IncentiveDataset, IncentiveRecord};
use crate::sales::{Powertrain, SalesRow, SalesTable};
use crate::station::{StationDataset, StationRecord};
use eva_utils::dates::parse_any_date;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Header naming the state column of a sales table.
pub const STATE_COLUMN: &str = "stateName";

/// Load one powertrain's annual sales table from CSV.
///
/// Cells that are not numeric are kept as `None` so that the year still
/// counts as covered; they contribute zero to every aggregate.
///
/// # Example CSV
/// ```text
/// stateName,2016,2017
/// California,1200,2400
/// ```
pub fn load_sales_table(powertrain: Powertrain, csv_data: &str) -> Result<SalesTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers = rdr.headers()?.clone();
    let state_idx = headers
        .iter()
        .position(|h| h.trim() == STATE_COLUMN)
        .ok_or_else(|| LoadError::MissingColumn(STATE_COLUMN.to_string()))?;
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| h.trim().parse::<i32>().ok().map(|year| (idx, year)))
        .collect();

    let mut table = SalesTable::new(powertrain);
    table.years = year_columns.iter().map(|(_, year)| *year).collect();

    let mut malformed = 0u32;
    for result in rdr.records() {
        let r = result?;
        let state = r.get(state_idx).unwrap_or("").trim();
        if state.is_empty() {
            log::warn!("[EVA Debug] loader: {} sales row without state skipped", powertrain);
            continue;
        }
        let mut annual = BTreeMap::new();
        for (idx, year) in &year_columns {
            let cell = r.get(*idx).unwrap_or("").trim();
            // negative counts are as malformed as text
            let value = cell.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0);
            if value.is_none() {
                malformed += 1;
            }
            annual.insert(*year, value);
        }
        table.rows.push(SalesRow {
            state: state.to_string(),
            annual,
        });
    }
    log::info!(
        "[EVA Debug] loader: Loaded {} {} sales rows over {} years, {} non-numeric cells",
        table.rows.len(),
        powertrain,
        table.years.len(),
        malformed
    );
    Ok(table)
}

#[derive(Debug, Deserialize)]
struct RawStation {
    #[serde(rename = "Open Date")]
    open_date: Option<String>,
    #[serde(rename = "Latitude")]
    latitude: Option<Value>,
    #[serde(rename = "Longitude")]
    longitude: Option<Value>,
}

/// Load the charging-station dataset from JSON.
///
/// Stations without a parseable opening date, or with fields of the wrong
/// JSON type, are skipped. A state whose value is not an array is dropped.
pub fn load_stations(json: &str) -> Result<StationDataset> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;

    let mut count = 0u32;
    let mut skipped = 0u32;
    let mut by_region = BTreeMap::new();
    for (state, value) in raw {
        let Some(stations) = entries::<RawStation>(&state, value, &mut skipped) else {
            continue;
        };
        let mut records = Vec::with_capacity(stations.len());
        for station in stations {
            let open_date = match station.open_date.as_deref().map(parse_any_date) {
                Some(Ok(date)) => date,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            records.push(StationRecord {
                open_date,
                latitude: station.latitude.as_ref().and_then(number),
                longitude: station.longitude.as_ref().and_then(number),
            });
            count += 1;
        }
        by_region.insert(state, records);
    }
    if skipped > 0 {
        log::warn!("[EVA Debug] loader: skipped {} malformed stations", skipped);
    }
    log::info!("[EVA Debug] loader: Loaded {} stations", count);
    Ok(StationDataset::new(by_region))
}

#[derive(Debug, Deserialize)]
struct RawIncentive {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Project Name")]
    project_name: Option<String>,
    #[serde(rename = "Types Supported")]
    types_supported: Option<String>,
}

/// Load the laws and incentives dataset from JSON.
///
/// Entries with an unparseable date, an unknown category, or fields of the
/// wrong JSON type are skipped. A state whose value is not an array is dropped.
pub fn load_incentives(json: &str) -> Result<IncentiveDataset> {
    let raw: BTreeMap<String, Value> = serde_json::from_str(json)?;

    let mut count = 0u32;
    let mut skipped = 0u32;
    let mut by_region = BTreeMap::new();
    for (state, value) in raw {
        let Some(incentives) = entries::<RawIncentive>(&state, value, &mut skipped) else {
            continue;
        };
        let mut records = Vec::with_capacity(incentives.len());
        for incentive in incentives {
            let date = incentive.date.as_deref().map(parse_any_date);
            let category = incentive.category.as_deref().map(str::parse::<IncentiveCategory>);
            let (Some(Ok(date)), Some(Ok(category))) = (date, category) else {
                skipped += 1;
                continue;
            };
            records.push(IncentiveRecord {
                state: state.clone(),
                date,
                category,
                project_name: incentive.project_name.unwrap_or_default(),
                types_supported: incentive
                    .types_supported
                    .as_deref()
                    .map(parse_types_supported)
                    .unwrap_or_else(BTreeSet::new),
            });
            count += 1;
        }
        by_region.insert(state, records);
    }
    if skipped > 0 {
        log::warn!("[EVA Debug] loader: skipped {} malformed incentives", skipped);
    }
    log::info!("[EVA Debug] loader: Loaded {} incentives", count);
    Ok(IncentiveDataset::new(by_region))
}

/// Decode one state's entry list record by record so a single bad row does
/// not take the whole dataset down. `None` when the value is not an array.
fn entries<T: DeserializeOwned>(state: &str, value: Value, skipped: &mut u32) -> Option<Vec<T>> {
    let Value::Array(items) = value else {
        log::warn!("[EVA Debug] loader: {} is not a list, skipping", state);
        *skipped += 1;
        return None;
    };
    let mut decoded = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<T>(item) {
            Ok(entry) => decoded.push(entry),
            Err(err) => {
                log::debug!("[EVA Debug] loader: bad entry in {}: {}", state, err);
                *skipped += 1;
            }
        }
    }
    Some(decoded)
}

/// Coordinates come as numbers or numeric strings depending on the export.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
