//! Visit reconstruction from point-of-sale lines.
//!
//! Sale lines carry one purchased item each; a customer buying several
//! items produces several consecutive lines with the same timestamp. This
//! module groups a sorted line stream back into visits keyed by
//! (timestamp, gender, age band), so that two customers transacting in the
//! same second are not merged into one.
//!
//! Builders for every visit open in the current timestamp run are held
//! live and mutated directly; a visit is appended to the output only once
//! its run ends, in the order the visits were first observed.

use chrono::NaiveDateTime;

use crate::domain::{SaleLine, Visit};
use crate::error::AppError;

/// Accumulates one visit while its timestamp run is still open.
struct VisitBuilder {
    visit: Visit,
}

impl VisitBuilder {
    fn open(line: &SaleLine) -> Self {
        Self {
            visit: Visit {
                timestamp: line.timestamp,
                day_of_week: line.day_of_week.clone(),
                gender: line.gender,
                age: line.age,
                purchased: Vec::new(),
                advertised: Vec::new(),
                bought_advertised: false,
                temperature_f: line.temperature_f,
                precipitation: line.precipitation,
            },
        }
    }

    fn matches(&self, line: &SaleLine) -> bool {
        self.visit.gender == line.gender && self.visit.age == line.age
    }

    fn absorb(&mut self, line: &SaleLine) {
        self.visit.purchased.push(line.item.clone());
        if !self.visit.advertised.iter().any(|i| *i == line.advertised) {
            self.visit.advertised.push(line.advertised.clone());
        }
        // Monotonic: once any line in the visit reports a purchase of the
        // advertised item, the flag stays set.
        if line.bought_advertised.unwrap_or(false) {
            self.visit.bought_advertised = true;
        }
    }

    fn finish(self) -> Visit {
        self.visit
    }
}

/// Group sorted sale lines into visits.
///
/// Input must be sorted ascending by timestamp; grouping walks the stream
/// once and cannot recover visits from unsorted lines.
pub fn build_visits(lines: &[SaleLine]) -> Result<Vec<Visit>, AppError> {
    for pair in lines.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(AppError::new(
                4,
                "sale lines are not sorted by timestamp; cannot build visits.",
            ));
        }
    }

    let mut visits = Vec::new();
    let mut open: Vec<VisitBuilder> = Vec::new();
    let mut run_ts: Option<NaiveDateTime> = None;

    for line in lines {
        if run_ts != Some(line.timestamp) {
            visits.extend(open.drain(..).map(VisitBuilder::finish));
            run_ts = Some(line.timestamp);
        }
        match open.iter_mut().find(|b| b.matches(line)) {
            Some(builder) => builder.absorb(line),
            None => {
                let mut builder = VisitBuilder::open(line);
                builder.absorb(line);
                open.push(builder);
            }
        }
    }
    visits.extend(open.drain(..).map(VisitBuilder::finish));

    Ok(visits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AgeBand, Gender, HealthClass, Item, ItemKind, Precipitation, ServeTemp};
    use chrono::NaiveDate;

    fn item(id: i32, health: HealthClass) -> Item {
        Item {
            id: Some(id),
            kind: ItemKind::Food,
            serve: ServeTemp::Hot,
            health,
        }
    }

    fn line(
        minute: u32,
        gender: Gender,
        age: AgeBand,
        purchased: Item,
        advertised: Item,
        bought: bool,
    ) -> SaleLine {
        SaleLine {
            timestamp: NaiveDate::from_ymd_opt(2017, 3, 5)
                .unwrap()
                .and_hms_opt(12, minute, 0)
                .unwrap(),
            day_of_week: "Sunday".to_string(),
            gender,
            age,
            dwell_secs: None,
            attention_secs: None,
            temperature_f: Some(55.4),
            humidity: None,
            precipitation: Precipitation::Clear,
            item: purchased,
            advertised,
            bought_advertised: Some(bought),
            total_customers: None,
        }
    }

    #[test]
    fn same_key_lines_merge_into_one_visit() {
        let adv = item(9, HealthClass::Healthy);
        let adv_other_health = item(9, HealthClass::Unhealthy);
        let lines = vec![
            line(0, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), adv.clone(), false),
            line(0, Gender::Female, AgeBand::Adult, item(2, HealthClass::Unhealthy), adv.clone(), true),
            line(0, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), adv_other_health.clone(), false),
        ];

        let visits = build_visits(&lines).unwrap();
        assert_eq!(visits.len(), 1);
        let visit = &visits[0];
        assert_eq!(visit.purchased.len(), 3);
        assert_eq!(visit.advertised.len(), 2);
        assert!(visit.bought_advertised);
    }

    #[test]
    fn bought_advertised_is_order_independent() {
        let adv = item(9, HealthClass::Healthy);
        for flag_position in 0..3 {
            let lines: Vec<SaleLine> = (0..3)
                .map(|i| {
                    line(
                        0,
                        Gender::Male,
                        AgeBand::Senior,
                        item(i, HealthClass::Healthy),
                        adv.clone(),
                        i == flag_position,
                    )
                })
                .collect();
            let visits = build_visits(&lines).unwrap();
            assert_eq!(visits.len(), 1);
            assert!(visits[0].bought_advertised);
        }
    }

    #[test]
    fn demographic_key_splits_a_timestamp_run() {
        let adv = item(9, HealthClass::Healthy);
        let lines = vec![
            line(0, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), adv.clone(), false),
            line(0, Gender::Male, AgeBand::Child, item(2, HealthClass::Unhealthy), adv.clone(), false),
            line(0, Gender::Female, AgeBand::Adult, item(3, HealthClass::Healthy), adv.clone(), false),
        ];

        let visits = build_visits(&lines).unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].gender, Gender::Female);
        assert_eq!(visits[0].purchased.len(), 2);
        assert_eq!(visits[1].gender, Gender::Male);
        assert_eq!(visits[1].purchased.len(), 1);
    }

    #[test]
    fn new_timestamp_run_reopens_the_same_key() {
        let adv = item(9, HealthClass::Healthy);
        let lines = vec![
            line(0, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), adv.clone(), false),
            line(5, Gender::Female, AgeBand::Adult, item(2, HealthClass::Healthy), adv.clone(), false),
        ];

        let visits = build_visits(&lines).unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].purchased.len(), 1);
        assert_eq!(visits[1].purchased.len(), 1);
        assert!(visits[0].timestamp < visits[1].timestamp);
    }

    #[test]
    fn advertised_dedup_uses_attribute_equality() {
        let mut adv_cold = item(9, HealthClass::Healthy);
        adv_cold.serve = ServeTemp::Cold;
        let lines = vec![
            line(0, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), item(9, HealthClass::Healthy), false),
            line(0, Gender::Female, AgeBand::Adult, item(2, HealthClass::Healthy), item(9, HealthClass::Healthy), false),
            line(0, Gender::Female, AgeBand::Adult, item(3, HealthClass::Healthy), adv_cold, false),
        ];

        let visits = build_visits(&lines).unwrap();
        assert_eq!(visits[0].advertised.len(), 2);
    }

    #[test]
    fn unsorted_lines_are_rejected() {
        let adv = item(9, HealthClass::Healthy);
        let lines = vec![
            line(5, Gender::Female, AgeBand::Adult, item(1, HealthClass::Healthy), adv.clone(), false),
            line(0, Gender::Female, AgeBand::Adult, item(2, HealthClass::Healthy), adv, false),
        ];
        assert_eq!(build_visits(&lines).unwrap_err().exit_code(), 4);
    }
}
