//! Fetching the three datasets.
//!
//! A source is a local path or an `http(s)` URL; a `.gz` suffix means the
//! content is gzip-compressed. The three datasets load concurrently and fail
//! independently: a dataset that cannot be loaded is logged and left out.

use eva_data::error::LoadError;
use eva_data::incentive::IncentiveDataset;
use eva_data::loader::{load_incentives, load_sales_table, load_stations};
use eva_data::sales::{Powertrain, SalesDataset, SalesTable};
use eva_data::station::StationDataset;
use eva_data::Datasets;
use flate2::read::GzDecoder;
use log::{error, info};
use std::io::Read;
use std::time::Duration;

/// Where each dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct DataSources {
    /// BEV sales CSV (path or URL)
    #[arg(long, default_value = "data/EV_sales.csv")]
    pub ev_sales: String,

    /// HEV sales CSV (path or URL)
    #[arg(long, default_value = "data/HEV_sales.csv")]
    pub hev_sales: String,

    /// PHEV sales CSV (path or URL)
    #[arg(long, default_value = "data/PHEV_sales.csv")]
    pub phev_sales: String,

    /// Charging stations JSON (path or URL)
    #[arg(long, default_value = "data/stations_par_etat.json")]
    pub stations: String,

    /// Laws and incentives JSON (path or URL)
    #[arg(long, default_value = "data/laws_and_incentives.json")]
    pub incentives: String,
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn decode(source: &str, bytes: Vec<u8>) -> Result<String, LoadError> {
    if source.ends_with(".gz") {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut text = String::new();
        decoder
            .read_to_string(&mut text)
            .map_err(|e| LoadError::Decompression(format!("{}: {}", source, e)))?;
        Ok(text)
    } else {
        String::from_utf8(bytes)
            .map_err(|e| LoadError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

/// Read a source into text.
pub async fn fetch_text(client: &reqwest::Client, source: &str) -> Result<String, LoadError> {
    let bytes = if is_url(source) {
        let response = client
            .get(source)
            .send()
            .await
            .map_err(|e| LoadError::HttpRequest(format!("{}: {}", source, e)))?;
        if !response.status().is_success() {
            return Err(LoadError::HttpRequest(format!(
                "{}: status {}",
                source,
                response.status()
            )));
        }
        response
            .bytes()
            .await
            .map_err(|e| LoadError::HttpRequest(format!("{}: {}", source, e)))?
            .to_vec()
    } else {
        tokio::fs::read(source).await?
    };
    decode(source, bytes)
}

async fn fetch_sales_table(
    client: &reqwest::Client,
    powertrain: Powertrain,
    source: &str,
) -> Result<SalesTable, LoadError> {
    let text = fetch_text(client, source).await?;
    load_sales_table(powertrain, &text)
}

/// Sales are one dataset made of three tables. A table that fails is
/// replaced by an empty one so the other powertrains still show; only when
/// all three fail is the dataset missing.
async fn fetch_sales(client: &reqwest::Client, sources: &DataSources) -> Option<SalesDataset> {
    let (bev, hev, phev) = tokio::join!(
        fetch_sales_table(client, Powertrain::Bev, &sources.ev_sales),
        fetch_sales_table(client, Powertrain::Hev, &sources.hev_sales),
        fetch_sales_table(client, Powertrain::Phev, &sources.phev_sales),
    );
    let mut any = false;
    let mut table = |powertrain: Powertrain, result: Result<SalesTable, LoadError>| match result {
        Ok(table) => {
            any = true;
            table
        }
        Err(e) => {
            error!("[EVA Debug] load: {} sales failed: {}", powertrain, e);
            SalesTable::new(powertrain)
        }
    };
    let dataset = SalesDataset {
        bev: table(Powertrain::Bev, bev),
        hev: table(Powertrain::Hev, hev),
        phev: table(Powertrain::Phev, phev),
    };
    any.then_some(dataset)
}

async fn fetch_stations(client: &reqwest::Client, source: &str) -> Option<StationDataset> {
    let loaded = match fetch_text(client, source).await {
        Ok(text) => load_stations(&text),
        Err(e) => Err(e),
    };
    loaded
        .map_err(|e| error!("[EVA Debug] load: stations from {} failed: {}", source, e))
        .ok()
}

async fn fetch_incentives(client: &reqwest::Client, source: &str) -> Option<IncentiveDataset> {
    let loaded = match fetch_text(client, source).await {
        Ok(text) => load_incentives(&text),
        Err(e) => Err(e),
    };
    loaded
        .map_err(|e| error!("[EVA Debug] load: incentives from {} failed: {}", source, e))
        .ok()
}

/// Load every dataset concurrently. Never fails as a whole; see the module
/// docs.
pub async fn load_datasets(sources: &DataSources) -> anyhow::Result<Datasets> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;
    let (sales, stations, incentives) = tokio::join!(
        fetch_sales(&client, sources),
        fetch_stations(&client, &sources.stations),
        fetch_incentives(&client, &sources.incentives),
    );
    let datasets = Datasets::new(sales, stations, incentives);
    info!(
        "[EVA Debug] load: sales={} stations={} incentives={}",
        datasets.sales.is_some(),
        datasets.stations.is_some(),
        datasets.incentives.is_some()
    );
    Ok(datasets)
}
