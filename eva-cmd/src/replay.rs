//! Replaying recorded interaction scripts against a dashboard.
//!
//! A script is JSON lines, one [`Interaction`] per line. Blank lines and
//! lines starting with `#` are ignored.

use eva_state::{Dashboard, Delivery, Interaction, ModelView, RenderModel, ViewKind};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Render models produced by one interaction (or by the initial render).
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub interaction: Option<Interaction>,
    pub models: Vec<RenderModel>,
}

pub fn parse_script(script: &str) -> anyhow::Result<Vec<Interaction>> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line)
                .map_err(|e| anyhow::anyhow!("Invalid interaction on line {}: {}", idx + 1, e))
        })
        .collect()
}

/// Subscribe one recording view per kind, render once, then apply each
/// interaction in turn. Debounced dashboards are flushed after every step.
pub fn replay(dashboard: &Dashboard, interactions: Vec<Interaction>, delivery: Delivery) -> Vec<Step> {
    let rendered: Rc<RefCell<Vec<RenderModel>>> = Rc::new(RefCell::new(Vec::new()));
    let subscriptions: Vec<_> = ViewKind::ALL
        .iter()
        .map(|kind| {
            let sink = rendered.clone();
            dashboard.subscribe(
                *kind,
                Rc::new(RefCell::new(ModelView::new(*kind, move |model| {
                    sink.borrow_mut().push(model)
                }))),
            )
        })
        .collect();

    let mut steps = Vec::with_capacity(interactions.len() + 1);
    dashboard.refresh();
    steps.push(Step {
        interaction: None,
        models: rendered.take(),
    });
    for interaction in interactions {
        dashboard.apply(interaction.clone());
        if let Delivery::Debounced(window) = delivery {
            dashboard.poll(Instant::now() + window);
        }
        steps.push(Step {
            interaction: Some(interaction),
            models: rendered.take(),
        });
    }

    for id in subscriptions {
        dashboard.unsubscribe(id);
    }
    log::info!("[EVA Debug] replay: {} steps, {} cycles", steps.len(), dashboard.cycles());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use eva_data::loader::{load_incentives, load_sales_table, load_stations};
    use eva_data::sales::{Powertrain, SalesDataset};
    use eva_data::Datasets;
    use eva_state::DashboardConfig;

    fn datasets() -> Datasets {
        let table = |p, csv| load_sales_table(p, csv).unwrap();
        let sales = SalesDataset {
            bev: table(Powertrain::Bev, "stateName,2016\nCalifornia,1200\n"),
            hev: table(Powertrain::Hev, "stateName,2016\nCalifornia,120\n"),
            phev: table(Powertrain::Phev, "stateName,2016\nCalifornia,24\n"),
        };
        let stations = load_stations(r#"{"California": [{"Open Date": "2016-02-01"}]}"#).unwrap();
        let incentives = load_incentives(
            r#"{"California": [{"Date": "2016-06-15", "Category": "Incentives", "Project Name": "Credit"}]}"#,
        )
        .unwrap();
        Datasets::new(Some(sales), Some(stations), Some(incentives))
    }

    const SCRIPT: &str = r#"
# narrow to Q1 and pick California
{"event": "dateRangeChanged", "start": "2016-01", "end": "2016-04"}
{"event": "regionClicked", "region": "California"}

{"event": "filterToggled", "key": "stations", "value": true}
{"event": "regionClicked", "region": "California"}
"#;

    #[test]
    fn scripts_skip_comments_and_blank_lines() {
        let interactions = parse_script(SCRIPT).unwrap();
        assert_eq!(interactions.len(), 4);
        assert!(matches!(interactions[1], Interaction::RegionClicked { .. }));
    }

    #[test]
    fn bad_lines_report_their_number() {
        let err = parse_script("\n{\"event\": \"nope\"}\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn every_effective_step_renders_all_views_in_order() {
        let config = DashboardConfig::default();
        let dashboard = Dashboard::new(datasets(), &config);
        let steps = replay(&dashboard, parse_script(SCRIPT).unwrap(), config.delivery());
        assert_eq!(steps.len(), 5);
        let kinds: Vec<ViewKind> = steps[0].models.iter().map(RenderModel::kind).collect();
        assert_eq!(kinds, ViewKind::ALL.to_vec());
        // stations were already on: nothing to render
        assert!(steps[3].models.is_empty());
        assert_eq!(steps[4].models.len(), 4);
        assert_eq!(dashboard.selection().region, None);
        assert_eq!(dashboard.cycles(), 4);
    }

    #[test]
    fn debounced_replay_still_renders_each_step() {
        let config = DashboardConfig {
            debounce_ms: Some(1_000),
            ..Default::default()
        };
        let dashboard = Dashboard::new(datasets(), &config);
        let steps = replay(&dashboard, parse_script(SCRIPT).unwrap(), config.delivery());
        assert_eq!(steps[1].models.len(), 4);
        assert_eq!(steps[2].models.len(), 4);
    }
}
