//! The five bounded 0-10 marketing scores.
//!
//! Each score divides a per-row point total by the dataset-wide maximum of
//! that total, so computation is inherently two-pass: collect raw points
//! for every row, then scale. An all-zero maximum substitutes 1 to keep
//! the division defined.

use anyhow::Result;
use tracing::debug;

use crate::merge::PRICE_COLUMN;
use crate::pipeline::{airbag_counts, feature_points, numeric_or_zero, sales_counts};
use crate::table::Table;

/// Tech and luxury flags counted into the feature score. ADAS flags are
/// included: they are headline selling points in this market.
const FEATURE_FLAGS: &[&str] = &[
    "SUNROOF",
    "WIRELESS_CHARGER",
    "POWER_TAILGATE",
    "ELECTRIC_SEAT",
    "VENTILATED_SEAT",
    "MASSAGE_SEAT",
    "HEAD_UP_DISPLAY",
    "SOFT_CLOSE_DOOR",
    "REAR_SEAT_ENTERTAINMENT",
    "AMBIENT_LIGHT",
    "APPLE_CARPLAY",
    "ANDROID_AUTO",
    "ACC",
    "LKA",
    "ACC_STOP_GO",
    "LANE_CENTERING",
    "DRIVER_MONITOR_CAMERA",
    "CAMERA_360",
];

/// Active-protection flags counted into the safety score.
const SAFETY_FLAGS: &[&str] = &["ABS", "EBD", "ESC", "TCS", "AEB", "RCTA", "ISOFIX"];

/// Each airbag is worth half a safety point.
const AIRBAG_WEIGHT: f64 = 0.5;
/// Torque weighs slightly below horsepower in the performance blend.
const TORQUE_WEIGHT: f64 = 0.8;
/// Rupiah prices make the raw value ratio microscopic; this factor brings
/// it back to a readable magnitude before rescaling.
const PRICE_FACTOR: f64 = 100_000_000.0;

/// Scales raw points to 0-10 against the dataset maximum.
fn scale_to_ten(points: &[f64]) -> Vec<f64> {
    let max = points.iter().cloned().fold(0.0_f64, f64::max);
    let max = if max == 0.0 { 1.0 } else { max };
    points.iter().map(|p| (p / max) * 10.0).collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Appends the five `SCORE_*` columns to the merged table.
///
/// The value score is derived from the unrounded feature, safety, and
/// performance scores; rounding to one decimal happens only at the end.
pub fn calculate_scores(table: &mut Table) -> Result<()> {
    let feature = scale_to_ten(&feature_points(table, FEATURE_FLAGS));

    let mut safety_points = feature_points(table, SAFETY_FLAGS);
    for (p, airbags) in safety_points.iter_mut().zip(airbag_counts(table)) {
        *p += airbags * AIRBAG_WEIGHT;
    }
    let safety = scale_to_ten(&safety_points);

    let hp = numeric_or_zero(table, "HORSE POWER (HP)");
    let torque = numeric_or_zero(table, "TORQUE (Nm)");
    let perf_points: Vec<f64> = hp
        .iter()
        .zip(&torque)
        .map(|(h, t)| h + t * TORQUE_WEIGHT)
        .collect();
    let performance = scale_to_ten(&perf_points);

    let sales = sales_counts(table);
    let max_sales = sales.iter().cloned().fold(0.0_f64, f64::max).max(1.0);
    let popularity: Vec<f64> = sales.iter().map(|s| (s / max_sales) * 10.0).collect();

    // goodness per rupiah, from the unrounded component scores
    let prices = numeric_or_zero(table, PRICE_COLUMN);
    let value_points: Vec<f64> = (0..table.len())
        .map(|row| {
            let goodness = feature[row] + safety[row] + performance[row];
            (goodness / prices[row]) * PRICE_FACTOR
        })
        .collect();
    let value = scale_to_ten(&value_points);

    debug!(rows = table.len(), "computed marketing scores");

    for (name, column) in [
        ("SCORE_FEATURE", feature),
        ("SCORE_SAFETY", safety),
        ("SCORE_PERFORMANCE", performance),
        ("SCORE_POPULARITY", popularity),
        ("SCORE_VALUE", value),
    ] {
        let rounded: Vec<f64> = column.into_iter().map(round1).collect();
        table.push_numeric_column(name, &rounded)?;
    }

    Ok(())
}
