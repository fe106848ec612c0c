//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main"
//! that:
//! - parses CLI arguments
//! - loads and aligns the input streams
//! - prints the load summary
//! - writes the joined datasets and generated scripts

use clap::Parser;

use crate::cli::{BuildArgs, Command, ScriptArgs};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io::export;
use crate::report;
use crate::script;

pub mod pipeline;

/// Entry point for the `cafe` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Build(args) => handle_build(args),
        Command::Visits(args) => handle_visits(args),
        Command::Scripts(args) => handle_scripts(args),
    }
}

fn handle_build(args: BuildArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_build(&config)?;

    println!("{}", report::format_load_summary(&run.report));

    if let Some(rows) = &run.weather_gates {
        let path = config.out_dir.join("weatherGatesData.csv");
        export::write_weather_gates_csv(&path, rows)?;
        println!("{} created.", path.display());

        let path = config.out_dir.join("weatherGatesPrecData.csv");
        export::write_weather_gates_prec_csv(&path, rows)?;
        println!("{} created.", path.display());
    } else {
        println!("weatherGatesData.csv skipped (weather or gates stream absent).");
        println!("weatherGatesPrecData.csv skipped (weather or gates stream absent).");
    }

    if let Some(views) = &run.streams.views {
        let path = config.out_dir.join("viewsFile.csv");
        export::write_views_csv(&path, views)?;
        println!("{} created.", path.display());
    } else {
        println!("viewsFile.csv skipped (views stream absent).");
    }

    if let Some(rows) = &run.gates_views {
        let path = config.out_dir.join("gatesViewsData.csv");
        export::write_gates_views_csv(&path, rows)?;
        println!("{} created.", path.display());
    } else {
        println!("gatesViewsData.csv skipped (gates or views stream absent).");
    }

    if let Some(visits) = &run.visits {
        let path = config.out_dir.join("healthyData.csv");
        export::write_visits_csv(&path, visits)?;
        println!("{} created.", path.display());
    } else {
        println!("healthyData.csv skipped (point-of-sale stream absent).");
    }

    write_scripts(&config.out_dir)?;

    if let Some(path) = &config.summary_json {
        export::write_summary_json(path, &run.report)?;
        println!("{} created.", path.display());
    }

    Ok(())
}

fn handle_visits(args: BuildArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run_visits(&config)?;

    println!("{}", report::format_load_summary(&run.report));

    if let Some(visits) = &run.visits {
        let path = config.out_dir.join("healthyData.csv");
        export::write_visits_csv(&path, visits)?;
        println!("{} created.", path.display());
    } else {
        println!("healthyData.csv skipped (point-of-sale stream absent).");
    }

    if let Some(path) = &config.summary_json {
        export::write_summary_json(path, &run.report)?;
        println!("{} created.", path.display());
    }

    Ok(())
}

fn handle_scripts(args: ScriptArgs) -> Result<(), AppError> {
    write_scripts(&args.out_dir)
}

fn write_scripts(out_dir: &std::path::Path) -> Result<(), AppError> {
    let path = out_dir.join("healthyScript.R");
    script::write_healthy_script(&path)?;
    println!("{} created.", path.display());

    let path = out_dir.join("weatherScript.R");
    script::write_weather_script(&path)?;
    println!("{} created.", path.display());

    Ok(())
}

pub fn run_config_from_args(args: &BuildArgs) -> RunConfig {
    RunConfig {
        weather_path: args
            .weather
            .clone()
            .unwrap_or_else(|| args.data_dir.join("weatherData.csv")),
        gates_path: args
            .gates
            .clone()
            .unwrap_or_else(|| args.data_dir.join("gatesData.csv")),
        views_path: args
            .views
            .clone()
            .unwrap_or_else(|| args.data_dir.join("viewsData.csv")),
        pos_path: args
            .pos
            .clone()
            .unwrap_or_else(|| args.data_dir.join("PointOfSaleSimulation.csv")),
        out_dir: args.out_dir.clone(),
        summary_json: args.summary_json.clone(),
    }
}
