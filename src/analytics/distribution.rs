//! Price-band distribution and raw metric series export.

use std::collections::BTreeMap;

use crate::analytics::all_metrics;
use crate::analytics::types::SegmentCount;
use crate::analytics::utility::safe;
use crate::merge::PRICE_COLUMN;
use crate::table::Table;

/// Rupiah band upper edges paired with their display labels. A price `p`
/// lands in the first band with `p <= edge`; anything above the last edge
/// is clamped into the top band so the counts always sum to the row count.
const PRICE_BANDS: &[(f64, &str)] = &[
    (200e6, "<200 Juta"),
    (300e6, "200-300 Juta"),
    (500e6, "300-500 Juta"),
    (800e6, "500-800 Juta"),
    (1e9, "800 Juta-1 Miliar"),
    (2e9, "1-2 Miliar"),
    (1e12, ">2 Miliar"),
];

/// Counts cars per price band, in ascending band order.
pub fn price_distribution(table: &Table) -> Vec<SegmentCount> {
    let mut counts = vec![0usize; PRICE_BANDS.len()];

    if let Some(prices) = table.numeric_column(PRICE_COLUMN) {
        for price in prices.into_iter().flatten() {
            let band = PRICE_BANDS
                .iter()
                .position(|(edge, _)| price <= *edge)
                .unwrap_or(PRICE_BANDS.len() - 1);
            counts[band] += 1;
        }
    }

    PRICE_BANDS
        .iter()
        .zip(counts)
        .map(|((_, label), count)| SegmentCount {
            segment: label.to_string(),
            count,
        })
        .collect()
}

/// Full-column series for every metric the table carries, in original row
/// order, for client-side plotting. Missing cells become null.
pub fn metric_series(table: &Table) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut series = BTreeMap::new();
    for (name, column) in all_metrics() {
        if let Some(values) = table.numeric_column(column) {
            let sanitized = values
                .into_iter()
                .map(|v| v.and_then(safe))
                .collect();
            series.insert(name.to_string(), sanitized);
        }
    }
    series
}
