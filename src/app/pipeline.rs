//! Shared load-and-align pipeline used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load streams -> bucket joins -> visit reconstruction
//!
//! The command handlers can then focus on presentation (printing the
//! summary, writing files).

use crate::domain::{GateFlow, GateRecord, RunConfig, ViewMix, ViewRecord, Visit, WeatherRecord};
use crate::error::AppError;
use crate::io::ingest::{self, LoadedStreams};
use crate::io::schema::Schemas;
use crate::join::{JoinRow, join_by_bucket};
use crate::report::LoadReport;
use crate::session::build_visits;
use crate::time::GridWidth;

/// All computed outputs of a full `cafe build` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub streams: LoadedStreams,
    pub report: LoadReport,
    pub weather_gates: Option<Vec<JoinRow<WeatherRecord, GateFlow>>>,
    pub gates_views: Option<Vec<JoinRow<GateRecord, ViewMix>>>,
    pub visits: Option<Vec<Visit>>,
}

/// Outputs of a `cafe visits` run.
#[derive(Debug, Clone)]
pub struct VisitsOutput {
    pub report: LoadReport,
    pub visits: Option<Vec<Visit>>,
}

/// Execute the full pipeline: load all four streams and compute every
/// derived dataset whose input streams are present.
pub fn run_build(config: &RunConfig) -> Result<RunOutput, AppError> {
    let schemas = Schemas::default();
    schemas.validate()?;

    let (streams, report) = ingest::load_streams(config, &schemas);

    let weather_gates = match (&streams.weather, &streams.gates) {
        (Some(weather), Some(gates)) => Some(join_by_bucket(
            weather,
            gates,
            GridWidth::QuarterHour,
            |flow: &mut GateFlow, gate: &GateRecord| flow.add(gate),
        )?),
        _ => None,
    };

    let gates_views = match (&streams.gates, &streams.views) {
        (Some(gates), Some(views)) => Some(join_by_bucket(
            gates,
            views,
            GridWidth::EighthHour,
            |mix: &mut ViewMix, view: &ViewRecord| mix.add(view),
        )?),
        _ => None,
    };

    let visits = match &streams.sales {
        Some(lines) => Some(build_visits(lines)?),
        None => None,
    };

    Ok(RunOutput {
        streams,
        report,
        weather_gates,
        gates_views,
        visits,
    })
}

/// Execute the point-of-sale-only pipeline.
pub fn run_visits(config: &RunConfig) -> Result<VisitsOutput, AppError> {
    let schemas = Schemas::default();
    schemas.validate()?;

    let (sales, sales_report) = ingest::load_sales(&config.pos_path, &schemas.pos);
    let visits = match &sales {
        Some(lines) => Some(build_visits(lines)?),
        None => None,
    };

    Ok(VisitsOutput {
        report: LoadReport {
            streams: vec![sales_report],
        },
        visits,
    })
}
