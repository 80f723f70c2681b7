//! Command implementations for the EVA CLI.
//!
//! Every command loads the datasets, builds a [`Dashboard`] and prints the
//! render model of one or all views.

use clap::{Args, Subcommand};
use eva_data::date_range::YearMonth;
use eva_state::{Dashboard, DashboardConfig, FilterKey, RenderModel, ViewKind};
use eva_utils::months::Locale;
use log::info;
use std::path::{Path, PathBuf};

pub mod load;
pub mod render;
pub mod replay;

use load::{load_datasets, DataSources};
use render::{render, OutputFormat};

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    #[command(flatten)]
    pub sources: DataSources,

    /// Dashboard settings (JSON): default range, picker bounds, filters, debounce
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Language of month labels in text output (en, fr)
    #[arg(long, default_value = "en")]
    pub locale: Locale,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// The selection to render, on top of the configured defaults.
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// First month included (YYYY-MM or a date)
    #[arg(long)]
    pub start: Option<YearMonth>,

    /// First month excluded (YYYY-MM or a date)
    #[arg(long)]
    pub end: Option<YearMonth>,

    /// Region (US state) to focus on; all regions when omitted
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// Filter toggle applied in order, e.g. `--filter aggregateSales=true`
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(FilterKey, bool)>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Per-region sales, station and incentive figures (map view)
    Summary {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Monthly series for the enabled categories (chart view)
    Series {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Laws and incentives enacted in the range (list view)
    Incentives {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Apply a JSON-lines interaction script and print every view after each step
    Replay {
        /// Path to the interaction script
        script: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Summary { common, selection } => run_view(ViewKind::Map, &common, &selection).await,
        Command::Series { common, selection } => run_view(ViewKind::Chart, &common, &selection).await,
        Command::Incentives { common, selection } => {
            run_view(ViewKind::List, &common, &selection).await
        }
        Command::Replay { script, common } => run_replay(&script, &common).await,
    }
}

/// `KEY=BOOL`, where KEY is a filter name such as `stations` or `EV_sales`.
pub fn parse_filter(s: &str) -> Result<(FilterKey, bool), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=true|false, got {:?}", s))?;
    let key: FilterKey = key.parse()?;
    let value: bool = value
        .trim()
        .parse()
        .map_err(|_| format!("expected true or false for {}, got {:?}", key, value))?;
    Ok((key, value))
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    DashboardConfig::from_json(&json)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Apply command-line selection through the regular event entry points.
pub fn apply_selection(dashboard: &Dashboard, selection: &SelectionArgs) {
    let current = dashboard.selection().date_range;
    let start = selection.start.unwrap_or(current.start);
    let end = selection.end.unwrap_or(current.end);
    if start >= end {
        log::warn!("[EVA Debug] cmd: range {}..{} is empty, output will be blank", start, end);
    }
    dashboard.on_date_range_changed(start, end);
    dashboard.on_region_selected(selection.region.clone());
    for (key, value) in &selection.filters {
        dashboard.on_filter_toggled(*key, *value);
    }
}

async fn build_dashboard(common: &CommonArgs) -> anyhow::Result<(Dashboard, DashboardConfig)> {
    let config = load_config(common.config.as_deref())?;
    let datasets = load_datasets(&common.sources).await?;
    Ok((Dashboard::new(datasets, &config), config))
}

async fn run_view(kind: ViewKind, common: &CommonArgs, selection: &SelectionArgs) -> anyhow::Result<()> {
    let (dashboard, _) = build_dashboard(common).await?;
    apply_selection(&dashboard, selection);
    let snapshot = dashboard.snapshot();
    info!(
        "Rendering {} view for {} ({})",
        kind,
        snapshot.selection.date_range,
        snapshot.region().unwrap_or("all regions")
    );
    let model = RenderModel::build(kind, &snapshot);
    println!("{}", render(&model, common.format, common.locale)?);
    Ok(())
}

async fn run_replay(script: &Path, common: &CommonArgs) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(script)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read script {}: {}", script.display(), e))?;
    let interactions = replay::parse_script(&text)?;
    let (dashboard, config) = build_dashboard(common).await?;
    info!("Replaying {} interactions from {}", interactions.len(), script.display());

    let steps = replay::replay(&dashboard, interactions, config.delivery());
    match common.format {
        OutputFormat::Json => {
            for step in &steps {
                println!("{}", serde_json::to_string(step)?);
            }
        }
        OutputFormat::Text => {
            for (idx, step) in steps.iter().enumerate() {
                match &step.interaction {
                    Some(interaction) => println!("# step {}: {}", idx, serde_json::to_string(interaction)?),
                    None => println!("# step {}: initial render", idx),
                }
                if step.models.is_empty() {
                    println!("(no change)");
                }
                for model in &step.models {
                    println!("{}", render(model, common.format, common.locale)?);
                }
            }
        }
    }
    Ok(())
}
