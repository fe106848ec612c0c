//! Column layout of the four input extracts.
//!
//! Each stream's layout (expected field count, column positions, timestamp
//! format) is an explicit configuration object handed to the loader, so a
//! re-exported file with shuffled columns only needs a different schema
//! value, not a code change. `validate` rejects layouts whose column
//! positions fall outside the declared field count.

use crate::error::AppError;

/// Weather extract layout.
#[derive(Debug, Clone)]
pub struct WeatherSchema {
    pub field_count: usize,
    pub timestamp_format: &'static str,
    pub timestamp: usize,
    pub temperature: usize,
    pub humidity: usize,
    pub precipitation: usize,
    pub severe: usize,
}

impl Default for WeatherSchema {
    fn default() -> Self {
        Self {
            field_count: 5,
            timestamp_format: "%m/%d/%Y %I:%M:%S %p",
            timestamp: 0,
            temperature: 1,
            humidity: 2,
            precipitation: 3,
            severe: 4,
        }
    }
}

impl WeatherSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        check_columns(
            "weather",
            &[
                self.timestamp,
                self.temperature,
                self.humidity,
                self.precipitation,
                self.severe,
            ],
            self.field_count,
        )
    }
}

/// Gates extract layout.
#[derive(Debug, Clone)]
pub struct GateSchema {
    pub field_count: usize,
    pub timestamp_format: &'static str,
    pub location: usize,
    pub gate: usize,
    pub timestamp: usize,
    pub duration: usize,
    pub in_count: usize,
    pub out_count: usize,
}

impl Default for GateSchema {
    fn default() -> Self {
        Self {
            field_count: 6,
            timestamp_format: "%Y-%m-%d %H:%M:%S",
            location: 0,
            gate: 1,
            timestamp: 2,
            duration: 3,
            in_count: 4,
            out_count: 5,
        }
    }
}

impl GateSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        check_columns(
            "gates",
            &[
                self.location,
                self.gate,
                self.timestamp,
                self.duration,
                self.in_count,
                self.out_count,
            ],
            self.field_count,
        )
    }
}

/// Views extract layout.
#[derive(Debug, Clone)]
pub struct ViewSchema {
    pub field_count: usize,
    pub timestamp_format: &'static str,
    pub location: usize,
    pub gender: usize,
    pub age: usize,
    pub timestamp: usize,
    pub dwell: usize,
    pub attention: usize,
    pub watcher_count: usize,
}

impl Default for ViewSchema {
    fn default() -> Self {
        Self {
            field_count: 7,
            timestamp_format: "%Y-%m-%d %H:%M:%S",
            location: 0,
            gender: 1,
            age: 2,
            timestamp: 3,
            dwell: 4,
            attention: 5,
            watcher_count: 6,
        }
    }
}

impl ViewSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        check_columns(
            "views",
            &[
                self.location,
                self.gender,
                self.age,
                self.timestamp,
                self.dwell,
                self.attention,
                self.watcher_count,
            ],
            self.field_count,
        )
    }
}

/// Point-of-sale extract layout.
#[derive(Debug, Clone)]
pub struct SaleSchema {
    pub field_count: usize,
    pub timestamp_format: &'static str,
    pub age_code: usize,
    pub gender_code: usize,
    pub dwell: usize,
    pub attention: usize,
    pub temperature: usize,
    pub humidity: usize,
    pub precipitation: usize,
    pub advertised_id: usize,
    pub advertised_kind: usize,
    pub advertised_serve: usize,
    pub advertised_health: usize,
    pub total_customers: usize,
    pub timestamp: usize,
    pub day_of_week: usize,
    pub item_id: usize,
    pub item_kind: usize,
    pub item_serve: usize,
    pub item_health: usize,
    pub bought_advertised: usize,
}

impl Default for SaleSchema {
    fn default() -> Self {
        Self {
            field_count: 21,
            timestamp_format: "%Y-%m-%d %H:%M:%S",
            age_code: 1,
            gender_code: 3,
            dwell: 4,
            attention: 5,
            temperature: 6,
            humidity: 7,
            precipitation: 8,
            advertised_id: 9,
            advertised_kind: 10,
            advertised_serve: 11,
            advertised_health: 12,
            total_customers: 13,
            timestamp: 14,
            day_of_week: 15,
            item_id: 16,
            item_kind: 17,
            item_serve: 18,
            item_health: 19,
            bought_advertised: 20,
        }
    }
}

impl SaleSchema {
    pub fn validate(&self) -> Result<(), AppError> {
        check_columns(
            "pos",
            &[
                self.age_code,
                self.gender_code,
                self.dwell,
                self.attention,
                self.temperature,
                self.humidity,
                self.precipitation,
                self.advertised_id,
                self.advertised_kind,
                self.advertised_serve,
                self.advertised_health,
                self.total_customers,
                self.timestamp,
                self.day_of_week,
                self.item_id,
                self.item_kind,
                self.item_serve,
                self.item_health,
                self.bought_advertised,
            ],
            self.field_count,
        )
    }
}

/// The four stream layouts used by a run.
#[derive(Debug, Clone, Default)]
pub struct Schemas {
    pub weather: WeatherSchema,
    pub gates: GateSchema,
    pub views: ViewSchema,
    pub pos: SaleSchema,
}

impl Schemas {
    pub fn validate(&self) -> Result<(), AppError> {
        self.weather.validate()?;
        self.gates.validate()?;
        self.views.validate()?;
        self.pos.validate()
    }
}

fn check_columns(stream: &str, columns: &[usize], field_count: usize) -> Result<(), AppError> {
    for &column in columns {
        if column >= field_count {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid {stream} schema: column index {column} is outside the declared field count {field_count}."
                ),
            ));
        }
    }
    Ok(())
}
