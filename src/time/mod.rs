//! Timestamp bucketing onto fixed grids.
//!
//! The four input streams are sampled at different moments, so before any
//! cross-stream join their timestamps are snapped onto a shared grid. Two
//! grids are in use:
//!
//! - `QuarterHour` (15 minutes), used for the weather/gates join
//! - `EighthHour` (7.5 minutes), used for the gates/views join
//!
//! Rounding is to the nearest grid line with ties going up, and carries
//! across hour/day/month/year boundaries (23:58 on the quarter-hour grid
//! lands on 00:00 of the next day). On the eighth-hour grid, half-grid
//! points fall between whole minutes and are represented with a 30-second
//! mark (e.g. 09:07:30), which keeps the two half-grid points straddling a
//! quarter hour distinguishable after rounding.

use chrono::{DateTime, NaiveDateTime, Timelike};

/// Grid resolution a timestamp is bucketed onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridWidth {
    /// 15-minute grid.
    QuarterHour,
    /// 7.5-minute grid (eight buckets per hour).
    EighthHour,
}

impl GridWidth {
    /// Grid width in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            GridWidth::QuarterHour => 900,
            GridWidth::EighthHour => 450,
        }
    }

    /// Grid width in minutes.
    pub fn minutes(self) -> f64 {
        match self {
            GridWidth::QuarterHour => 15.0,
            GridWidth::EighthHour => 7.5,
        }
    }
}

/// Types carrying an observation timestamp.
///
/// Implemented by every stream record so the join can stay generic over
/// the concrete record type.
pub trait Timestamped {
    fn timestamp(&self) -> NaiveDateTime;
}

/// Snap a timestamp to the nearest grid line.
///
/// The offset within the hour is taken at second precision, so 09:07:29
/// rounds down to 09:00:00 while 09:07:30 rounds up to 09:15:00 on the
/// quarter-hour grid. An exact midpoint rounds up on both grids.
pub fn bucket(t: NaiveDateTime, grid: GridWidth) -> NaiveDateTime {
    let width = grid.seconds();
    // Both grid widths divide the hour evenly, so snapping epoch seconds
    // is equivalent to snapping the minute+second offset within the hour
    // and calendar carry falls out of the arithmetic.
    let secs = t.and_utc().timestamp();
    let rem = secs.rem_euclid(width);
    let snapped = if rem * 2 < width {
        secs - rem
    } else {
        secs + (width - rem)
    };
    DateTime::from_timestamp(snapped, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(t)
}

/// Truncate a timestamp to whole-minute precision.
pub fn minute_floor(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|x| x.with_nanosecond(0))
        .unwrap_or(t)
}

/// Whether two timestamps land in the same bucket on the given grid.
///
/// Bucketed values are compared at minute precision: the 30-second mark on
/// the eighth-hour grid participates in the rounding but not the equality.
pub fn bucket_eq(a: NaiveDateTime, b: NaiveDateTime, grid: GridWidth) -> bool {
    minute_floor(bucket(a, grid)) == minute_floor(bucket(b, grid))
}

/// Minute of the day (0..=1439), used as a model feature in the exports.
pub fn minute_of_day(t: NaiveDateTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Whether a timestamp falls in the lunch window (11:00 to 13:00).
pub fn is_lunch_time(t: NaiveDateTime) -> bool {
    t.hour() >= 11 && t.hour() < 13
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn quarter_hour_boundary_examples() {
        assert_eq!(
            bucket(at(2017, 3, 5, 9, 7, 29), GridWidth::QuarterHour),
            at(2017, 3, 5, 9, 0, 0)
        );
        assert_eq!(
            bucket(at(2017, 3, 5, 9, 7, 30), GridWidth::QuarterHour),
            at(2017, 3, 5, 9, 15, 0)
        );
        assert_eq!(
            bucket(at(2017, 3, 5, 8, 52, 30), GridWidth::QuarterHour),
            at(2017, 3, 5, 9, 0, 0)
        );
    }

    #[test]
    fn eighth_hour_midpoint_rounds_up() {
        assert_eq!(
            bucket(at(2017, 3, 5, 9, 3, 45), GridWidth::EighthHour),
            at(2017, 3, 5, 9, 7, 30)
        );
        assert_eq!(
            bucket(at(2017, 3, 5, 9, 3, 44), GridWidth::EighthHour),
            at(2017, 3, 5, 9, 0, 0)
        );
    }

    #[test]
    fn eighth_hour_half_grid_points_stay_distinct() {
        let low = bucket(at(2017, 3, 5, 9, 5, 0), GridWidth::EighthHour);
        let high = bucket(at(2017, 3, 5, 9, 9, 0), GridWidth::EighthHour);
        assert_eq!(low, at(2017, 3, 5, 9, 7, 30));
        assert_eq!(low, high);
        assert_ne!(
            bucket(at(2017, 3, 5, 9, 12, 0), GridWidth::EighthHour),
            low
        );
    }

    #[test]
    fn rolls_over_day_month_year() {
        assert_eq!(
            bucket(at(2020, 12, 31, 23, 58, 0), GridWidth::QuarterHour),
            at(2021, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            bucket(at(2017, 2, 28, 23, 56, 15), GridWidth::EighthHour),
            at(2017, 3, 1, 0, 0, 0)
        );
    }

    #[test]
    fn bucket_is_idempotent_and_aligned() {
        let samples = [
            at(2017, 3, 5, 9, 7, 29),
            at(2017, 3, 5, 9, 3, 45),
            at(2020, 12, 31, 23, 58, 0),
            at(2017, 1, 1, 0, 0, 0),
            at(2019, 6, 15, 11, 52, 31),
            at(2019, 6, 15, 12, 22, 30),
        ];
        for grid in [GridWidth::QuarterHour, GridWidth::EighthHour] {
            for t in samples {
                let b = bucket(t, grid);
                assert_eq!(bucket(b, grid), b, "bucket not idempotent for {t}");
                let offset = i64::from(b.minute()) * 60 + i64::from(b.second());
                assert_eq!(offset % grid.seconds(), 0, "bucket not on grid for {t}");
            }
        }
    }

    #[test]
    fn bucket_eq_compares_at_minute_precision() {
        let grid = GridWidth::QuarterHour;
        assert!(bucket_eq(
            at(2017, 3, 5, 9, 7, 29),
            at(2017, 3, 5, 8, 52, 30),
            grid
        ));
        assert!(!bucket_eq(
            at(2017, 3, 5, 9, 7, 29),
            at(2017, 3, 5, 9, 7, 30),
            grid
        ));
    }

    #[test]
    fn minute_of_day_and_lunch_window() {
        assert_eq!(minute_of_day(at(2017, 3, 5, 9, 15, 0)), 555);
        assert_eq!(minute_of_day(at(2017, 3, 5, 0, 0, 59)), 0);
        assert!(!is_lunch_time(at(2017, 3, 5, 10, 59, 59)));
        assert!(is_lunch_time(at(2017, 3, 5, 11, 0, 0)));
        assert!(is_lunch_time(at(2017, 3, 5, 12, 59, 59)));
        assert!(!is_lunch_time(at(2017, 3, 5, 13, 0, 0)));
    }
}
