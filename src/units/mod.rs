//! Weather unit conversions and comfort indexes.
//!
//! All temperatures in the pipeline are Fahrenheit; the weather and
//! point-of-sale extracts report Celsius and are converted at parse time.

/// Convert degrees Celsius to degrees Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Heat index (apparent temperature) from the NWS regression.
///
/// The regression is only defined for warm conditions; returns `None`
/// below 70 degrees Fahrenheit.
pub fn heat_index(temperature_f: f64, humidity: f64) -> Option<f64> {
    if temperature_f < 70.0 {
        return None;
    }

    const C1: f64 = -42.379;
    const C2: f64 = 2.04901523;
    const C3: f64 = 10.14333127;
    const C4: f64 = -0.22475541;
    const C5: f64 = -0.00683783;
    const C6: f64 = -0.05481717;
    const C7: f64 = 0.00122874;
    const C8: f64 = 0.00085282;
    const C9: f64 = -0.00000199;

    let t = temperature_f;
    let h = humidity;
    Some(
        C1 + (C2 * t)
            + (C3 * h)
            + (C4 * t * h)
            + (C5 * t * t)
            + (C6 * h * h)
            + (C7 * t * t * h)
            + (C8 * t * h * h)
            + (C9 * t * t * h * h),
    )
}

/// Wind chill temperature at the local average winter wind speed.
pub fn wind_chill(temperature_f: f64) -> f64 {
    const WIND_SPEED_MPH: f64 = 10.0; // Lexington, KY winter average
    35.74 + (0.6215 * temperature_f) - (35.75 * WIND_SPEED_MPH.powf(0.16))
        + (0.4275 * temperature_f * WIND_SPEED_MPH.powf(0.16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_conversions() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < 1e-12);
        assert!((celsius_to_fahrenheit(-40.0) - -40.0).abs() < 1e-12);
    }

    #[test]
    fn heat_index_undefined_below_seventy() {
        assert!(heat_index(69.9, 50.0).is_none());
        assert!(heat_index(70.0, 50.0).is_some());
    }

    #[test]
    fn heat_index_matches_reference_point() {
        // NWS table value for 80F at 40% relative humidity is about 80F.
        let hi = heat_index(80.0, 40.0).unwrap();
        assert!((hi - 79.93).abs() < 0.1, "got {hi}");
    }

    #[test]
    fn wind_chill_matches_reference_point() {
        // NWS table value for 30F at 10mph is about 21F.
        let wc = wind_chill(30.0);
        assert!((wc - 21.2).abs() < 0.2, "got {wc}");
    }
}
