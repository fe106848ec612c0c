//! Generation of R model-search scripts.
//!
//! The downstream analysis sweeps many predictor combinations against the
//! exported datasets. The sweep itself runs in R; this module only emits
//! the templated script text, keyed to the column names of the
//! corresponding CSV export.
//!
//! The combination pattern: for every rotation of the predictor list,
//! every pair of a single head variable and a tail slice forms one model,
//! so each variable leads the formula with every suffix of the rotated
//! list behind it. For `n` predictors this produces `n * n * (n + 1) / 2`
//! formulas.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;

const HEALTHY_PREDICTORS: [&str; 9] = [
    "DayOfMonth",
    "DayOfWeek",
    "Minute",
    "Gender",
    "Age",
    "AdvHealth",
    "AdvTemp",
    "Temperature",
    "Precipitation",
];

const WEATHER_PREDICTORS: [&str; 6] = [
    "DayOfMonth",
    "DayOfWeek",
    "Minute",
    "Temperature",
    "Precipitation",
    "Humidity",
];

/// Write the naive-Bayes sweep over the visit dataset columns.
pub fn write_healthy_script(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;
    let mut body = String::new();

    body.push_str("healthyTester <- function(dataset) {\n");
    push_split_preamble(&mut body);
    for set in predictor_sets(&HEALTHY_PREDICTORS) {
        let formula = set.join("+");
        let label = set.join(",");
        body.push_str(&format!(
            "\tm <- naiveBayes(boughtHealthy ~ {formula}, data = trainData)\n"
        ));
        body.push_str("\tp <- predict(m, testData)\n");
        body.push_str(&format!(
            "\tprint(sprintf(\"({label}): %s\", prop.table(table(p == testData$boughtHealthy))[2]))\n\n"
        ));
    }
    body.push_str("}\n");

    file.write_all(body.as_bytes())
        .map_err(|e| write_failed(path, e))
}

/// Write the M5P sweep over the weather/gates dataset columns.
pub fn write_weather_script(path: &Path) -> Result<(), AppError> {
    let mut file = create(path)?;
    let mut body = String::new();

    body.push_str("weatherTester <- function(dataset) {\n");
    push_split_preamble(&mut body);
    for set in predictor_sets(&WEATHER_PREDICTORS) {
        let formula = set.join("+");
        let label = set.join(",");
        body.push_str(&format!(
            "\tm <- M5P(InCount ~ {formula}, data = trainData)\n"
        ));
        body.push_str("\tp <- predict(m, testData)\n");
        body.push_str(&format!(
            "\tprint(sprintf(\"({label}): %f\", rSquared(actualValues = testData$InCount, predictedValues = p)))\n\n"
        ));
    }
    body.push_str("}\n");

    file.write_all(body.as_bytes())
        .map_err(|e| write_failed(path, e))
}

fn push_split_preamble(body: &mut String) {
    body.push_str("\trandData <- dataset[sample(1:nrow(dataset)),]\n");
    body.push_str("\ttrainData <- randData[1:(floor(nrow(randData)*0.8)),]\n");
    body.push_str("\ttestData <- randData[(floor(nrow(randData)*0.8)+1):nrow(randData),]\n\n");
}

/// Enumerate predictor combinations: every rotation of `vars`, and within
/// each rotation every `[head] ++ tail-suffix` slice.
fn predictor_sets<'a>(vars: &[&'a str]) -> Vec<Vec<&'a str>> {
    let n = vars.len();
    let mut sets = Vec::new();
    for start in 0..n {
        let rotation: Vec<&str> = (0..n).map(|k| vars[(start + k) % n]).collect();
        for head in 0..n {
            for tail in (head + 1)..=n {
                let mut set = vec![rotation[head]];
                set.extend_from_slice(&rotation[tail..]);
                sets.push(set);
            }
        }
    }
    sets
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}

fn write_failed(path: &Path, e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write '{}': {e}", path.display()))
}
