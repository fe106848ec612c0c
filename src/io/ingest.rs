//! CSV ingest and field coercion.
//!
//! This module turns the four raw extracts into clean, sorted record
//! vectors that are safe to join.
//!
//! Design goals:
//! - **Schema-driven extraction**: column positions come from a validated
//!   schema object, never from constants baked into the parse code
//! - **Row-level containment**: a bad row is skipped and counted, a bad
//!   field becomes a missing value; neither aborts the load
//! - **Stream independence**: a missing file makes only that stream
//!   absent; every other stream still loads
//! - **Deterministic behavior** (no hidden randomness)
//!
//! Coercion policy, applied uniformly to numeric and boolean fields: an
//! empty field (after trimming) yields the type's default value (0, 0.0,
//! false) with no warning; a non-empty field that fails to parse yields a
//! missing value and a collected warning carrying the raw text. The two
//! cases stay distinguishable downstream.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::domain::{
    AgeBand, GateRecord, Gender, HealthClass, Item, ItemKind, Precipitation, RunConfig, SaleLine,
    ServeTemp, ViewRecord, WeatherRecord,
};
use crate::io::schema::{GateSchema, SaleSchema, Schemas, ViewSchema, WeatherSchema};
use crate::report::{LoadReport, StreamReport};
use crate::units;

/// The four streams of a run; `None` marks a stream whose file was
/// missing or unreadable.
#[derive(Debug, Clone, Default)]
pub struct LoadedStreams {
    pub weather: Option<Vec<WeatherRecord>>,
    pub gates: Option<Vec<GateRecord>>,
    pub views: Option<Vec<ViewRecord>>,
    pub sales: Option<Vec<SaleLine>>,
}

/// Load every stream named by the config. Never fails as a whole: absent
/// streams and skipped rows are recorded in the returned report.
pub fn load_streams(config: &RunConfig, schemas: &Schemas) -> (LoadedStreams, LoadReport) {
    let (weather, weather_report) = load_weather(&config.weather_path, &schemas.weather);
    let (gates, gates_report) = load_gates(&config.gates_path, &schemas.gates);
    let (views, views_report) = load_views(&config.views_path, &schemas.views);
    let (sales, sales_report) = load_sales(&config.pos_path, &schemas.pos);

    (
        LoadedStreams {
            weather,
            gates,
            views,
            sales,
        },
        LoadReport {
            streams: vec![weather_report, gates_report, views_report, sales_report],
        },
    )
}

pub fn load_weather(
    path: &Path,
    schema: &WeatherSchema,
) -> (Option<Vec<WeatherRecord>>, StreamReport) {
    let mut report = StreamReport::new("weather", path);
    let Ok(file) = File::open(path) else {
        report.absent = true;
        return (None, report);
    };
    let records = read_weather(file, schema, &mut report);
    (Some(records), report)
}

pub fn load_gates(path: &Path, schema: &GateSchema) -> (Option<Vec<GateRecord>>, StreamReport) {
    let mut report = StreamReport::new("gates", path);
    let Ok(file) = File::open(path) else {
        report.absent = true;
        return (None, report);
    };
    let records = read_gates(file, schema, &mut report);
    (Some(records), report)
}

pub fn load_views(path: &Path, schema: &ViewSchema) -> (Option<Vec<ViewRecord>>, StreamReport) {
    let mut report = StreamReport::new("views", path);
    let Ok(file) = File::open(path) else {
        report.absent = true;
        return (None, report);
    };
    let records = read_views(file, schema, &mut report);
    (Some(records), report)
}

pub fn load_sales(path: &Path, schema: &SaleSchema) -> (Option<Vec<SaleLine>>, StreamReport) {
    let mut report = StreamReport::new("pos", path);
    let Ok(file) = File::open(path) else {
        report.absent = true;
        return (None, report);
    };
    let records = read_sales(file, schema, &mut report);
    (Some(records), report)
}

/// Parse weather samples from raw CSV bytes and sort them by timestamp.
pub fn read_weather<R: Read>(
    input: R,
    schema: &WeatherSchema,
    report: &mut StreamReport,
) -> Vec<WeatherRecord> {
    let mut records = read_rows(input, schema.field_count, report, |record, line, report| {
        let timestamp =
            parse_timestamp(record, schema.timestamp, schema.timestamp_format, line, report)?;
        let temperature_c = coerce_f64(record, schema.temperature, "temperature", line, report);
        Some(WeatherRecord {
            timestamp,
            temperature_f: temperature_c.map(units::celsius_to_fahrenheit),
            humidity: coerce_i32(record, schema.humidity, "humidity", line, report),
            precipitation: Precipitation::from_label(field(record, schema.precipitation)),
            severe: coerce_bool(record, schema.severe, "severe", line, report),
        })
    });
    records.sort_by_key(|r| r.timestamp);
    report.rows_loaded = records.len();
    records
}

/// Parse gate samples from raw CSV bytes and sort them by timestamp.
pub fn read_gates<R: Read>(
    input: R,
    schema: &GateSchema,
    report: &mut StreamReport,
) -> Vec<GateRecord> {
    let mut records = read_rows(input, schema.field_count, report, |record, line, report| {
        let timestamp =
            parse_timestamp(record, schema.timestamp, schema.timestamp_format, line, report)?;
        Some(GateRecord {
            location: coerce_i32(record, schema.location, "location", line, report),
            gate: coerce_i32(record, schema.gate, "gate", line, report),
            timestamp,
            duration_secs: coerce_i32(record, schema.duration, "duration", line, report),
            in_count: coerce_i32(record, schema.in_count, "in_count", line, report),
            out_count: coerce_i32(record, schema.out_count, "out_count", line, report),
        })
    });
    records.sort_by_key(|r| r.timestamp);
    report.rows_loaded = records.len();
    records
}

/// Parse occupancy observations from raw CSV bytes and sort them by timestamp.
pub fn read_views<R: Read>(
    input: R,
    schema: &ViewSchema,
    report: &mut StreamReport,
) -> Vec<ViewRecord> {
    let mut records = read_rows(input, schema.field_count, report, |record, line, report| {
        let timestamp =
            parse_timestamp(record, schema.timestamp, schema.timestamp_format, line, report)?;
        Some(ViewRecord {
            location: coerce_i32(record, schema.location, "location", line, report),
            gender: Gender::from_code(
                coerce_i32(record, schema.gender, "gender", line, report).unwrap_or(0),
            ),
            age: AgeBand::from_code(
                coerce_i32(record, schema.age, "age", line, report).unwrap_or(0),
            ),
            timestamp,
            dwell_secs: coerce_i32(record, schema.dwell, "dwell", line, report),
            attention_secs: coerce_i32(record, schema.attention, "attention", line, report),
            watcher_count: coerce_i32(record, schema.watcher_count, "watcher_count", line, report),
        })
    });
    records.sort_by_key(|r| r.timestamp);
    report.rows_loaded = records.len();
    records
}

/// Parse point-of-sale lines from raw CSV bytes and sort them by timestamp.
pub fn read_sales<R: Read>(
    input: R,
    schema: &SaleSchema,
    report: &mut StreamReport,
) -> Vec<SaleLine> {
    let mut records = read_rows(input, schema.field_count, report, |record, line, report| {
        let timestamp =
            parse_timestamp(record, schema.timestamp, schema.timestamp_format, line, report)?;
        let temperature_c = coerce_f64(record, schema.temperature, "temperature", line, report);
        Some(SaleLine {
            timestamp,
            day_of_week: field(record, schema.day_of_week).to_string(),
            gender: Gender::from_code(
                coerce_i32(record, schema.gender_code, "gender", line, report).unwrap_or(0),
            ),
            age: AgeBand::from_code(
                coerce_i32(record, schema.age_code, "age", line, report).unwrap_or(0),
            ),
            dwell_secs: coerce_f64(record, schema.dwell, "dwell", line, report),
            attention_secs: coerce_f64(record, schema.attention, "attention", line, report),
            temperature_f: temperature_c.map(units::celsius_to_fahrenheit),
            humidity: coerce_f64(record, schema.humidity, "humidity", line, report),
            precipitation: Precipitation::from_label(field(record, schema.precipitation)),
            item: Item {
                id: coerce_i32(record, schema.item_id, "item_id", line, report),
                kind: ItemKind::from_label(field(record, schema.item_kind)),
                serve: ServeTemp::from_label(field(record, schema.item_serve)),
                health: HealthClass::from_label(field(record, schema.item_health)),
            },
            advertised: Item {
                id: coerce_i32(record, schema.advertised_id, "advertised_id", line, report),
                kind: ItemKind::from_label(field(record, schema.advertised_kind)),
                serve: ServeTemp::from_label(field(record, schema.advertised_serve)),
                health: HealthClass::from_label(field(record, schema.advertised_health)),
            },
            bought_advertised: coerce_bool(
                record,
                schema.bought_advertised,
                "bought_advertised",
                line,
                report,
            ),
            total_customers: coerce_i32(
                record,
                schema.total_customers,
                "total_customers",
                line,
                report,
            ),
        })
    });
    records.sort_by_key(|r| r.timestamp);
    report.rows_loaded = records.len();
    records
}

/// Shared row loop: reads raw records, rejects rows whose field count does
/// not match the schema, and delegates the rest to the per-stream parser.
fn read_rows<R, T, F>(
    input: R,
    field_count: usize,
    report: &mut StreamReport,
    mut parse: F,
) -> Vec<T>
where
    R: Read,
    F: FnMut(&StringRecord, usize, &mut StreamReport) -> Option<T>,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        report.rows_read += 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(idx + 1);
                report.skip(line);
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        if record.len() != field_count {
            report.skip(line);
            continue;
        }
        if let Some(value) = parse(&record, line, report) {
            out.push(value);
        }
    }
    out
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn coerce_i32(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
    line: usize,
    report: &mut StreamReport,
) -> Option<i32> {
    let raw = field(record, idx);
    if raw.is_empty() {
        return Some(0);
    }
    match raw.parse::<i32>() {
        Ok(v) => Some(v),
        Err(_) => {
            report.warn(line, name, raw);
            None
        }
    }
}

fn coerce_f64(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
    line: usize,
    report: &mut StreamReport,
) -> Option<f64> {
    let raw = field(record, idx);
    if raw.is_empty() {
        return Some(0.0);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            report.warn(line, name, raw);
            None
        }
    }
}

fn coerce_bool(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
    line: usize,
    report: &mut StreamReport,
) -> Option<bool> {
    let raw = field(record, idx);
    if raw.is_empty() {
        return Some(false);
    }
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        report.warn(line, name, raw);
        None
    }
}

/// A record without a usable timestamp cannot be bucketed at all, so an
/// unparseable timestamp rejects the whole row (with a warning naming the
/// raw value) instead of producing a record that poisons every join.
fn parse_timestamp(
    record: &StringRecord,
    idx: usize,
    format: &str,
    line: usize,
    report: &mut StreamReport,
) -> Option<NaiveDateTime> {
    let raw = field(record, idx);
    match NaiveDateTime::parse_from_str(raw, format) {
        Ok(t) => Some(t),
        Err(_) => {
            report.warn(line, "timestamp", raw);
            report.skip(line);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weather_report() -> StreamReport {
        StreamReport::new("weather", Path::new("weatherData.csv"))
    }

    #[test]
    fn weather_row_parses_and_converts_to_fahrenheit() {
        let data = "01/05/2017 09:07:29 AM,13.0,45,Clear,false\n";
        let mut report = weather_report();
        let records = read_weather(data.as_bytes(), &WeatherSchema::default(), &mut report);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(
            r.timestamp,
            NaiveDate::from_ymd_opt(2017, 1, 5)
                .unwrap()
                .and_hms_opt(9, 7, 29)
                .unwrap()
        );
        assert!((r.temperature_f.unwrap() - 55.4).abs() < 1e-9);
        assert_eq!(r.humidity, Some(45));
        assert_eq!(r.precipitation, Precipitation::Clear);
        assert_eq!(r.severe, Some(false));
        assert_eq!(report.rows_loaded, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn empty_field_yields_default_without_warning() {
        let data = "01/05/2017 09:07:29 AM,,,Clear,\n";
        let mut report = weather_report();
        let records = read_weather(data.as_bytes(), &WeatherSchema::default(), &mut report);

        assert_eq!(records.len(), 1);
        // Default 0.0C converts to 32F.
        assert!((records[0].temperature_f.unwrap() - 32.0).abs() < 1e-9);
        assert_eq!(records[0].humidity, Some(0));
        assert_eq!(records[0].severe, Some(false));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn unparseable_field_becomes_missing_with_warning() {
        let data = "01/05/2017 09:07:29 AM,13.0,damp,Clear,perhaps\n";
        let mut report = weather_report();
        let records = read_weather(data.as_bytes(), &WeatherSchema::default(), &mut report);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].humidity, None);
        assert_eq!(records[0].severe, None);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].raw, "damp");
    }

    #[test]
    fn wrong_field_count_skips_the_whole_row() {
        let data = "01/05/2017 09:00:00 AM,13.0,45,Clear,false\n01/05/2017 09:15:00 AM,14.0,44\n";
        let mut report = weather_report();
        let records = read_weather(data.as_bytes(), &WeatherSchema::default(), &mut report);

        assert_eq!(records.len(), 1);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.skipped_lines, vec![2]);
    }

    #[test]
    fn unparseable_timestamp_skips_the_row() {
        let data = "not a date,13.0,45,Clear,false\n";
        let mut report = weather_report();
        let records = read_weather(data.as_bytes(), &WeatherSchema::default(), &mut report);

        assert!(records.is_empty());
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "timestamp");
    }

    #[test]
    fn records_are_sorted_after_load() {
        let data = "\
3,1,2017-03-05 10:00:00,60,4,2\n\
2,1,2017-03-05 09:00:00,60,3,1\n";
        let mut report = StreamReport::new("gates", Path::new("gatesData.csv"));
        let records = read_gates(data.as_bytes(), &GateSchema::default(), &mut report);

        assert_eq!(records.len(), 2);
        assert!(records[0].timestamp < records[1].timestamp);
        assert_eq!(records[0].in_count, Some(3));
        assert_eq!(records[0].out_count, Some(1));
    }

    #[test]
    fn view_codes_decode_to_categories() {
        let data = "1,2,4,2017-03-05 09:00:00,30,12,3\n1,9,,2017-03-05 09:01:00,30,12,3\n";
        let mut report = StreamReport::new("views", Path::new("viewsData.csv"));
        let records = read_views(data.as_bytes(), &ViewSchema::default(), &mut report);

        assert_eq!(records[0].gender, Gender::Female);
        assert_eq!(records[0].age, AgeBand::Senior);
        // Out-of-range code and empty code both land on Unknown.
        assert_eq!(records[1].gender, Gender::Unknown);
        assert_eq!(records[1].age, AgeBand::Unknown);
    }

    #[test]
    fn sale_line_parses_both_items() {
        let data = "Adult,3,Female,2,10.5,3.2,13.0,40,Rain,7,Drink,Cold,Unhealthy,5,\
2017-03-05 12:00:00,Sunday,4,Food,Hot,Healthy,true\n";
        let mut report = StreamReport::new("pos", Path::new("PointOfSaleSimulation.csv"));
        let records = read_sales(data.as_bytes(), &SaleSchema::default(), &mut report);

        assert_eq!(records.len(), 1);
        let line = &records[0];
        assert_eq!(line.gender, Gender::Female);
        assert_eq!(line.age, AgeBand::Adult);
        assert_eq!(line.day_of_week, "Sunday");
        assert_eq!(line.item.id, Some(4));
        assert_eq!(line.item.kind, ItemKind::Food);
        assert_eq!(line.item.health, HealthClass::Healthy);
        assert_eq!(line.advertised.id, Some(7));
        assert_eq!(line.advertised.serve, ServeTemp::Cold);
        assert_eq!(line.advertised.health, HealthClass::Unhealthy);
        assert_eq!(line.bought_advertised, Some(true));
        assert!((line.temperature_f.unwrap() - 55.4).abs() < 1e-9);
        assert_eq!(line.precipitation, Precipitation::Rain);
        assert_eq!(line.total_customers, Some(5));
    }

    #[test]
    fn missing_file_marks_stream_absent() {
        let (records, report) = load_weather(
            Path::new("definitely/not/here/weatherData.csv"),
            &WeatherSchema::default(),
        );
        assert!(records.is_none());
        assert!(report.absent);
    }

    #[test]
    fn streams_load_independently() {
        let dir = std::env::temp_dir().join(format!("cafe_align_ingest_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let gates_path = dir.join("gatesData.csv");
        std::fs::write(&gates_path, "2,1,2017-03-05 09:00:00,60,3,1\n").unwrap();

        let config = RunConfig {
            weather_path: dir.join("missing-weatherData.csv"),
            gates_path: gates_path.clone(),
            views_path: dir.join("missing-viewsData.csv"),
            pos_path: dir.join("missing-PointOfSaleSimulation.csv"),
            out_dir: dir.clone(),
            summary_json: None,
        };
        let (streams, report) = load_streams(&config, &Schemas::default());

        assert!(streams.weather.is_none());
        assert_eq!(streams.gates.as_ref().map(Vec::len), Some(1));
        assert!(report.streams[0].absent);
        assert!(!report.streams[1].absent);

        std::fs::remove_file(&gates_path).ok();
        std::fs::remove_dir(&dir).ok();
    }
}
