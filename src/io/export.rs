//! Export joined datasets to CSV and the load summary to JSON.
//!
//! Every file gets one fixed header row; missing values render as empty
//! cells so spreadsheet tools and R read them as NA rather than zero.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Datelike;

use crate::domain::{GateFlow, GateRecord, HealthClass, ViewMix, ViewRecord, Visit, WeatherRecord};
use crate::error::AppError;
use crate::join::JoinRow;
use crate::report::LoadReport;
use crate::time::minute_of_day;

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Weather samples with gate traffic summed into their quarter-hour bucket.
pub fn write_weather_gates_csv(
    path: &Path,
    rows: &[JoinRow<WeatherRecord, GateFlow>],
) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(
        file,
        "Datetime,Date,DayOfMonth,DayOfWeek,Minute,Temperature,Humidity,Precipitation,InCount,OutCount"
    )
    .map_err(|e| write_failed(path, e))?;

    for row in rows {
        let weather = &row.outer;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{}",
            row.bucket.format(DATETIME_FMT),
            row.bucket.format("%Y-%m-%d"),
            row.bucket.day(),
            row.bucket.format("%A"),
            minute_of_day(row.bucket),
            opt(weather.temperature_f),
            opt(weather.humidity),
            weather.precipitation.label(),
            row.aggregate.in_total,
            row.aggregate.out_total,
        )
        .map_err(|e| write_failed(path, e))?;
    }

    Ok(())
}

/// Same join as `write_weather_gates_csv`, with precipitation rendered as
/// its numeric code and the severe-weather flag included.
pub fn write_weather_gates_prec_csv(
    path: &Path,
    rows: &[JoinRow<WeatherRecord, GateFlow>],
) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(
        file,
        "Datetime,Date,Day of month,Day of week,Minute of day,Temperature (F),Humidity (%),Precipitation,Is severe weather,In count,Out count"
    )
    .map_err(|e| write_failed(path, e))?;

    for row in rows {
        let weather = &row.outer;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            row.bucket.format(DATETIME_FMT),
            row.bucket.format("%Y-%m-%d"),
            row.bucket.day(),
            row.bucket.format("%A"),
            minute_of_day(row.bucket),
            opt(weather.temperature_f),
            opt(weather.humidity),
            weather.precipitation.code(),
            opt(weather.severe),
            row.aggregate.in_total,
            row.aggregate.out_total,
        )
        .map_err(|e| write_failed(path, e))?;
    }

    Ok(())
}

/// Occupancy observations, one row per record, with derived time features.
pub fn write_views_csv(path: &Path, views: &[ViewRecord]) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(file, "Datetime,Minute,DayOfWeek,Age,Gender,AttentionTime,DwellTime")
        .map_err(|e| write_failed(path, e))?;

    for view in views {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            view.timestamp.format(DATETIME_FMT),
            minute_of_day(view.timestamp),
            view.timestamp.format("%A"),
            view.age.label(),
            view.gender.label(),
            opt(view.attention_secs),
            opt(view.dwell_secs),
        )
        .map_err(|e| write_failed(path, e))?;
    }

    Ok(())
}

/// Gate samples with watcher demographics counted into their eighth-hour
/// bucket.
pub fn write_gates_views_csv(
    path: &Path,
    rows: &[JoinRow<GateRecord, ViewMix>],
) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(
        file,
        "Datetime,Minute,DayOfWeek,InCount,OutCount,Male,Female,GenderUnknown,Child,YoungAdult,Adult,Senior,AgeUnknown"
    )
    .map_err(|e| write_failed(path, e))?;

    for row in rows {
        let gate = &row.outer;
        let mix = &row.aggregate;
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            row.bucket.format(DATETIME_FMT),
            minute_of_day(row.bucket),
            row.bucket.format("%A"),
            opt(gate.in_count),
            opt(gate.out_count),
            mix.male,
            mix.female,
            mix.gender_unknown,
            mix.child,
            mix.young_adult,
            mix.adult,
            mix.senior,
            mix.age_unknown,
        )
        .map_err(|e| write_failed(path, e))?;
    }

    Ok(())
}

/// One row per visit: healthy/unhealthy purchase counts plus the merged
/// advertised-item profile.
pub fn write_visits_csv(path: &Path, visits: &[Visit]) -> Result<(), AppError> {
    let mut file = create(path)?;

    writeln!(
        file,
        "Date,DayOfMonth,Minute,DayOfWeek,HealthyCount,UnhealthyCount,Percentage,Gender,Age,AdvHealth,BoughtAdv,AdvTemp,AdvType,Temperature,Precipitation"
    )
    .map_err(|e| write_failed(path, e))?;

    for visit in visits {
        let healthy = visit
            .purchased
            .iter()
            .filter(|i| i.health == HealthClass::Healthy)
            .count();
        let total = visit.purchased.len();
        let percentage = if total == 0 {
            0.0
        } else {
            healthy as f64 / total as f64 * 100.0
        };
        let (adv_health, adv_serve, adv_kind) = advertised_profile(visit);

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            visit.timestamp.format(DATETIME_FMT),
            visit.timestamp.day(),
            minute_of_day(visit.timestamp),
            visit.day_of_week,
            healthy,
            total - healthy,
            percentage,
            visit.gender.label(),
            visit.age.label(),
            adv_health,
            visit.bought_advertised,
            adv_serve,
            adv_kind,
            opt(visit.temperature_f),
            visit.precipitation.label(),
        )
        .map_err(|e| write_failed(path, e))?;
    }

    Ok(())
}

/// Write the load report as JSON for machine consumption.
pub fn write_summary_json(path: &Path, report: &LoadReport) -> Result<(), AppError> {
    let file = create(path)?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON '{}': {e}", path.display())))?;
    Ok(())
}

/// Merge the advertised items of a visit into single health/serve/kind
/// labels; mixed exposure collapses to "Both".
fn advertised_profile(visit: &Visit) -> (String, String, String) {
    let mut health: Option<&'static str> = None;
    let mut serve: Option<&'static str> = None;
    let mut kind: Option<&'static str> = None;

    for item in &visit.advertised {
        merge(&mut health, item.health.label());
        merge(&mut serve, item.serve.label());
        merge(&mut kind, item.kind.label());
    }

    (
        health.unwrap_or_default().to_string(),
        serve.unwrap_or_default().to_string(),
        kind.unwrap_or_default().to_string(),
    )
}

fn merge(slot: &mut Option<&'static str>, label: &'static str) {
    match slot {
        None => *slot = Some(label),
        Some(current) if *current != label => *slot = Some("Both"),
        _ => {}
    }
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_failed(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write '{}': {e}", path.display()))
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
