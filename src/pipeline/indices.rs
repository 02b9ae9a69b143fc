//! The eight z-score composite indices.
//!
//! Column groups and combination rules are declarative configuration:
//! adding or removing a contributing column is a data change here, not a
//! code change. Columns absent from the dataset are skipped; an index with
//! nothing to contribute defaults to 0.

use anyhow::Result;
use tracing::debug;

use crate::merge::{PRICE_COLUMN, SALES_COLUMN};
use crate::normalize::{zscore, zscore_dense};
use crate::pipeline::{airbag_counts, feature_points};
use crate::table::Table;

/// How a column group is collapsed into one index.
enum Rule {
    /// Mean of per-column z-scores; columns listed in `invert` have their
    /// z-scores sign-flipped (lower raw value is better).
    MeanOfZ {
        columns: &'static [&'static str],
        invert: &'static [&'static str],
    },
    /// Z-score of a raw feature-point sum; `with_airbags` folds the airbag
    /// count (default 2) into the sum first.
    ZOfPoints {
        flags: &'static [&'static str],
        with_airbags: bool,
    },
    /// Z-score of a single column, optionally negated.
    ZOfColumn { column: &'static str, negate: bool },
}

struct IndexSpec {
    output: &'static str,
    rule: Rule,
}

const SAFETY_FLAGS: &[&str] = &[
    "ABS",
    "EBD",
    "ESC",
    "TCS",
    "AEB",
    "RCTA",
    "ACC",
    "LKA",
    "ACC_STOP_GO",
    "LANE_CENTERING",
    "CAMERA_360",
    "REAR_CAMERA",
    "PARK_SENSOR_FRONT",
    "PARK_SENSOR_REAR",
];

const COMFORT_FLAGS: &[&str] = &[
    "LEATHER_SEAT",
    "VENTILATED_SEAT",
    "MASSAGE_SEAT",
    "SOFT_TOUCH_INTERIOR",
    "AIR_SUSPENSION",
    "SUNROOF",
    "AMBIENT_LIGHT",
    "ELECTRIC_SEAT",
    "POWER_TAILGATE",
];

const TECH_FLAGS: &[&str] = &[
    "APPLE_CARPLAY",
    "ANDROID_AUTO",
    "HEAD_UP_DISPLAY",
    "DRIVER_MONITOR_CAMERA",
    "REAR_SEAT_ENTERTAINMENT",
    "WIRELESS_CHARGER",
    "CAMERA_360",
];

static INDEX_SPECS: &[IndexSpec] = &[
    IndexSpec {
        output: "INDEX_PERFORMANCE",
        rule: Rule::MeanOfZ {
            columns: &[
                "HORSE POWER (HP)",
                "TORQUE (Nm)",
                "CC",
                "WEIGHT (GVW)",
                "EV_RANGE_KM",
                "BATTERY (KWH)",
            ],
            invert: &[],
        },
    },
    IndexSpec {
        output: "INDEX_EFFICIENCY",
        rule: Rule::MeanOfZ {
            columns: &["CC", "WEIGHT (GVW)", "EV_RANGE_KM", "BATTERY (KWH)"],
            // smaller displacement and weight mean a more efficient car
            invert: &["CC", "WEIGHT (GVW)"],
        },
    },
    IndexSpec {
        output: "INDEX_SAFETY",
        rule: Rule::ZOfPoints {
            flags: SAFETY_FLAGS,
            with_airbags: true,
        },
    },
    IndexSpec {
        output: "INDEX_COMFORT",
        rule: Rule::ZOfPoints {
            flags: COMFORT_FLAGS,
            with_airbags: false,
        },
    },
    IndexSpec {
        output: "INDEX_TECH",
        rule: Rule::ZOfPoints {
            flags: TECH_FLAGS,
            with_airbags: false,
        },
    },
    IndexSpec {
        output: "INDEX_SPACE",
        rule: Rule::MeanOfZ {
            columns: &[
                "SEAT",
                "TRUNK_CAPACITY_LITER",
                "LONG",
                "WIDTH",
                "HEIGHT",
                "WHEELBASE",
                "GROUND CLEARENCE",
                "DOOR",
            ],
            invert: &[],
        },
    },
    IndexSpec {
        output: "INDEX_POPULARITY",
        rule: Rule::ZOfColumn {
            column: SALES_COLUMN,
            negate: false,
        },
    },
    IndexSpec {
        output: "INDEX_PRICE",
        // cheaper car, higher index
        rule: Rule::ZOfColumn {
            column: PRICE_COLUMN,
            negate: true,
        },
    },
];

/// Appends the eight `INDEX_*` columns to the merged table.
pub fn calculate_indices(table: &mut Table) -> Result<()> {
    for spec in INDEX_SPECS {
        let values = match &spec.rule {
            Rule::MeanOfZ { columns, invert } => mean_of_z(table, columns, invert),
            Rule::ZOfPoints { flags, with_airbags } => z_of_points(table, flags, *with_airbags),
            Rule::ZOfColumn { column, negate } => z_of_column(table, column, *negate),
        };
        debug!(index = spec.output, "computed index column");
        table.push_numeric_column(spec.output, &values)?;
    }
    Ok(())
}

/// Per-row mean of the z-scores of every configured column present in the
/// dataset. Rows missing a cell skip that column; a row with no
/// contributing value, like an index with no available columns, gets 0.
fn mean_of_z(table: &Table, columns: &[&str], invert: &[&str]) -> Vec<f64> {
    let mut sums = vec![0.0; table.len()];
    let mut counts = vec![0u32; table.len()];

    for &column in columns {
        let Some(raw) = table.numeric_column(column) else {
            continue;
        };
        let flip = if invert.contains(&column) { -1.0 } else { 1.0 };
        for (row, z) in zscore(&raw).into_iter().enumerate() {
            if let Some(z) = z {
                sums[row] += flip * z;
                counts[row] += 1;
            }
        }
    }

    sums.iter()
        .zip(&counts)
        .map(|(s, c)| if *c == 0 { 0.0 } else { s / *c as f64 })
        .collect()
}

fn z_of_points(table: &Table, flags: &[&str], with_airbags: bool) -> Vec<f64> {
    let mut points = feature_points(table, flags);
    if with_airbags {
        for (p, airbags) in points.iter_mut().zip(airbag_counts(table)) {
            *p += airbags;
        }
    }
    zscore_dense(&points)
}

fn z_of_column(table: &Table, column: &str, negate: bool) -> Vec<f64> {
    let raw = table
        .numeric_column(column)
        .unwrap_or_else(|| vec![None; table.len()]);
    let sign = if negate { -1.0 } else { 1.0 };
    zscore(&raw)
        .into_iter()
        .map(|z| sign * z.unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn enriched(csv: &str) -> Table {
        let mut t = Table::from_reader(csv.as_bytes()).unwrap();
        calculate_indices(&mut t).unwrap();
        t
    }

    fn index(t: &Table, row: usize, name: &str) -> f64 {
        t.numeric_column(name).unwrap()[row].unwrap()
    }

    #[test]
    fn test_two_row_dataset() {
        // spec sheet already merged: sales column present, both zero
        let t = enriched(
            "BRAND,MODEL,VARIAN,HARGAOTR,HORSE POWER (HP),AIRBAGS,TOTAL_2025\n\
             X,A,1,300000000,100,2,0\n\
             X,B,1,500000000,200,6,0\n",
        );

        // identical sales, zero variance: both popularity indices are 0
        assert_eq!(index(&t, 0, "INDEX_POPULARITY"), 0.0);
        assert_eq!(index(&t, 1, "INDEX_POPULARITY"), 0.0);

        // higher horsepower wins on performance
        assert!(index(&t, 1, "INDEX_PERFORMANCE") > index(&t, 0, "INDEX_PERFORMANCE"));
        assert!((index(&t, 0, "INDEX_PERFORMANCE") + 1.0).abs() < EPS);
        assert!((index(&t, 1, "INDEX_PERFORMANCE") - 1.0).abs() < EPS);

        // cheaper car wins on price
        assert!(index(&t, 0, "INDEX_PRICE") > index(&t, 1, "INDEX_PRICE"));

        // more airbags wins on safety
        assert!(index(&t, 1, "INDEX_SAFETY") > index(&t, 0, "INDEX_SAFETY"));
    }

    #[test]
    fn test_absent_columns_default_to_zero() {
        let t = enriched(
            "BRAND,MODEL,VARIAN,HARGAOTR,TOTAL_2025\nX,A,1,100,0\nX,B,1,200,0\n",
        );
        // no space columns anywhere in the sheet
        assert_eq!(index(&t, 0, "INDEX_SPACE"), 0.0);
        assert_eq!(index(&t, 1, "INDEX_SPACE"), 0.0);
        // no flags, no AIRBAGS column: constant point sum z-scores to 0
        assert_eq!(index(&t, 0, "INDEX_SAFETY"), 0.0);
    }

    #[test]
    fn test_efficiency_inverts_displacement_and_weight() {
        let t = enriched(
            "BRAND,MODEL,VARIAN,HARGAOTR,CC,WEIGHT (GVW),TOTAL_2025\n\
             X,A,1,100,1000,900,0\n\
             X,B,1,100,2500,1800,0\n",
        );
        // smaller engine and lighter body place row 0 ahead
        assert!(index(&t, 0, "INDEX_EFFICIENCY") > index(&t, 1, "INDEX_EFFICIENCY"));
        // while raw performance favors row 1
        assert!(index(&t, 1, "INDEX_PERFORMANCE") > index(&t, 0, "INDEX_PERFORMANCE"));
    }

    #[test]
    fn test_mean_of_z_skips_missing_cells() {
        let t = enriched(
            "BRAND,MODEL,VARIAN,HARGAOTR,HORSE POWER (HP),TORQUE (Nm),TOTAL_2025\n\
             X,A,1,100,100,,0\n\
             X,B,1,100,200,300,0\n\
             X,C,1,100,300,500,0\n",
        );
        // row 0 averages over HP alone; still finite and ordered
        let p0 = index(&t, 0, "INDEX_PERFORMANCE");
        let p2 = index(&t, 2, "INDEX_PERFORMANCE");
        assert!(p0.is_finite());
        assert!(p2 > p0);
    }

    #[test]
    fn test_comfort_counts_flags() {
        let t = enriched(
            "BRAND,MODEL,VARIAN,HARGAOTR,SUNROOF,AMBIENT_LIGHT,TOTAL_2025\n\
             X,A,1,100,Yes,Yes,0\n\
             X,B,1,100,No,No,0\n",
        );
        assert!(index(&t, 0, "INDEX_COMFORT") > index(&t, 1, "INDEX_COMFORT"));
    }
}
