//! Shared domain types.
//!
//! Stream records are created once at parse time and never mutated; every
//! numeric or boolean field is `Option`-valued so a value that failed to
//! parse stays distinguishable from a supplied default (see `io::ingest`
//! for the coercion rules).

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::time::Timestamped;

/// Customer gender as coded in the views and point-of-sale extracts.
///
/// Out-of-range codes collapse to `Unknown` rather than failing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Gender::Male,
            2 => Gender::Female,
            _ => Gender::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Customer age band as coded in the views and point-of-sale extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Unknown,
    Child,
    YoungAdult,
    Adult,
    Senior,
}

impl AgeBand {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => AgeBand::Child,
            2 => AgeBand::YoungAdult,
            3 => AgeBand::Adult,
            4 => AgeBand::Senior,
            _ => AgeBand::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Unknown => "Unknown",
            AgeBand::Child => "Child",
            AgeBand::YoungAdult => "Young Adult",
            AgeBand::Adult => "Adult",
            AgeBand::Senior => "Senior",
        }
    }
}

/// Weather condition category.
///
/// Decoded from free-text labels in the weather and point-of-sale
/// extracts; one export renders the numeric code for modeling tools that
/// prefer ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precipitation {
    Unknown,
    Clear,
    Clouds,
    Drizzle,
    Fog,
    Mist,
    Rain,
    Snow,
}

impl Precipitation {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Clear" => Precipitation::Clear,
            "Clouds" => Precipitation::Clouds,
            "Drizzle" => Precipitation::Drizzle,
            "Fog" => Precipitation::Fog,
            "Mist" => Precipitation::Mist,
            "Rain" => Precipitation::Rain,
            "Snow" => Precipitation::Snow,
            _ => Precipitation::Unknown,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Precipitation::Unknown => 0,
            Precipitation::Clear => 1,
            Precipitation::Clouds => 2,
            Precipitation::Drizzle => 3,
            Precipitation::Fog => 4,
            Precipitation::Mist => 5,
            Precipitation::Rain => 6,
            Precipitation::Snow => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Precipitation::Unknown => "Unknown",
            Precipitation::Clear => "Clear",
            Precipitation::Clouds => "Clouds",
            Precipitation::Drizzle => "Drizzle",
            Precipitation::Fog => "Fog",
            Precipitation::Mist => "Mist",
            Precipitation::Rain => "Rain",
            Precipitation::Snow => "Snow",
        }
    }
}

/// Whether an item is food or drink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Food,
    Drink,
    Unknown,
}

impl ItemKind {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Food" => ItemKind::Food,
            "Drink" => ItemKind::Drink,
            _ => ItemKind::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Food => "Food",
            ItemKind::Drink => "Drink",
            ItemKind::Unknown => "Unknown",
        }
    }
}

/// Whether an item is served hot or cold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeTemp {
    Hot,
    Cold,
    Unknown,
}

impl ServeTemp {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Hot" => ServeTemp::Hot,
            "Cold" => ServeTemp::Cold,
            _ => ServeTemp::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServeTemp::Hot => "Hot",
            ServeTemp::Cold => "Cold",
            ServeTemp::Unknown => "Unknown",
        }
    }
}

/// Health classification of an item. Labels other than `Healthy` count as
/// unhealthy, matching the upstream extract's convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthClass {
    Healthy,
    Unhealthy,
}

impl HealthClass {
    pub fn from_label(label: &str) -> Self {
        if label.trim() == "Healthy" {
            HealthClass::Healthy
        } else {
            HealthClass::Unhealthy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthClass::Healthy => "Healthy",
            HealthClass::Unhealthy => "Unhealthy",
        }
    }
}

/// A purchased or advertised item.
///
/// Equality is attribute equality over all four fields; the advertised
/// item dedup in visit building relies on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: Option<i32>,
    pub kind: ItemKind,
    pub serve: ServeTemp,
    pub health: HealthClass,
}

/// One weather sample. Temperature is converted to Fahrenheit at parse
/// time; the source extract reports Celsius.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub timestamp: NaiveDateTime,
    pub temperature_f: Option<f64>,
    pub humidity: Option<i32>,
    pub precipitation: Precipitation,
    pub severe: Option<bool>,
}

/// One entry/exit gate sample.
#[derive(Debug, Clone, PartialEq)]
pub struct GateRecord {
    pub location: Option<i32>,
    pub gate: Option<i32>,
    pub timestamp: NaiveDateTime,
    pub duration_secs: Option<i32>,
    pub in_count: Option<i32>,
    pub out_count: Option<i32>,
}

/// One demographic occupancy ("views") observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRecord {
    pub location: Option<i32>,
    pub gender: Gender,
    pub age: AgeBand,
    pub timestamp: NaiveDateTime,
    pub dwell_secs: Option<i32>,
    pub attention_secs: Option<i32>,
    pub watcher_count: Option<i32>,
}

/// One point-of-sale line: a single purchased item plus the advertisement
/// and ambient-weather context captured with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub timestamp: NaiveDateTime,
    pub day_of_week: String,
    pub gender: Gender,
    pub age: AgeBand,
    pub dwell_secs: Option<f64>,
    pub attention_secs: Option<f64>,
    pub temperature_f: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Precipitation,
    pub item: Item,
    pub advertised: Item,
    pub bought_advertised: Option<bool>,
    pub total_customers: Option<i32>,
}

impl Timestamped for WeatherRecord {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl Timestamped for GateRecord {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl Timestamped for ViewRecord {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl Timestamped for SaleLine {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// A reconstructed customer transaction event.
///
/// Keyed by (timestamp, gender, age). Purchased items keep duplicates
/// (repeat purchases are legitimate); advertised items are deduplicated by
/// attribute equality; `bought_advertised` only ever transitions from
/// false to true.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub timestamp: NaiveDateTime,
    pub day_of_week: String,
    pub gender: Gender,
    pub age: AgeBand,
    pub purchased: Vec<Item>,
    pub advertised: Vec<Item>,
    pub bought_advertised: bool,
    pub temperature_f: Option<f64>,
    pub precipitation: Precipitation,
}

/// Gate traffic aggregated into one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateFlow {
    pub in_total: i64,
    pub out_total: i64,
}

impl GateFlow {
    pub fn add(&mut self, gate: &GateRecord) {
        self.in_total += i64::from(gate.in_count.unwrap_or(0));
        self.out_total += i64::from(gate.out_count.unwrap_or(0));
    }
}

/// Watcher demographics aggregated into one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewMix {
    pub male: i64,
    pub female: i64,
    pub gender_unknown: i64,
    pub child: i64,
    pub young_adult: i64,
    pub adult: i64,
    pub senior: i64,
    pub age_unknown: i64,
}

impl ViewMix {
    pub fn add(&mut self, view: &ViewRecord) {
        match view.gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
            Gender::Unknown => self.gender_unknown += 1,
        }
        match view.age {
            AgeBand::Child => self.child += 1,
            AgeBand::YoungAdult => self.young_adult += 1,
            AgeBand::Adult => self.adult += 1,
            AgeBand::Senior => self.senior += 1,
            AgeBand::Unknown => self.age_unknown += 1,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub weather_path: PathBuf,
    pub gates_path: PathBuf,
    pub views_path: PathBuf,
    pub pos_path: PathBuf,
    pub out_dir: PathBuf,
    pub summary_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorical_codes_round_trip_known_values() {
        assert_eq!(Gender::from_code(1), Gender::Male);
        assert_eq!(Gender::from_code(2).label(), "Female");
        assert_eq!(Gender::from_code(7), Gender::Unknown);

        assert_eq!(AgeBand::from_code(2).label(), "Young Adult");
        assert_eq!(AgeBand::from_code(-1), AgeBand::Unknown);

        assert_eq!(Precipitation::from_label("Drizzle").code(), 3);
        assert_eq!(Precipitation::from_label("hailstorm"), Precipitation::Unknown);
        assert_eq!(Precipitation::from_label(" Snow ").label(), "Snow");
    }

    #[test]
    fn health_defaults_to_unhealthy_for_unknown_labels() {
        assert_eq!(HealthClass::from_label("Healthy"), HealthClass::Healthy);
        assert_eq!(HealthClass::from_label("Sugary"), HealthClass::Unhealthy);
        assert_eq!(HealthClass::from_label(""), HealthClass::Unhealthy);
    }

    #[test]
    fn item_equality_covers_all_attributes() {
        let base = Item {
            id: Some(4),
            kind: ItemKind::Drink,
            serve: ServeTemp::Cold,
            health: HealthClass::Unhealthy,
        };
        assert_eq!(base, base.clone());
        assert_ne!(
            base,
            Item {
                health: HealthClass::Healthy,
                ..base.clone()
            }
        );
        assert_ne!(base, Item { id: Some(5), ..base.clone() });
    }
}
