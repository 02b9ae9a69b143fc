//! Headline KPI summary.

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

use crate::analytics::all_metrics;
use crate::analytics::types::Summary;
use crate::analytics::utility::{median, quantile, safe, sample_stddev};
use crate::merge::PRICE_COLUMN;
use crate::normalize::mean;
use crate::table::Table;

fn present(table: &Table, column: &str) -> Vec<f64> {
    table
        .numeric_column(column)
        .map(|col| col.into_iter().flatten().collect())
        .unwrap_or_default()
}

fn p75(table: &Table, column: &str) -> Option<f64> {
    quantile(&present(table, column), 0.75).and_then(safe)
}

/// Computes the summary KPIs over the enriched table.
///
/// `total_cars` is the post-filter row count; averages cover whichever
/// metric columns the selected pipeline produced.
pub fn summary(table: &Table) -> Summary {
    let brands: BTreeSet<&str> = table
        .column("BRAND")
        .map(|col| col.into_iter().collect())
        .unwrap_or_default();

    let prices = present(table, PRICE_COLUMN);

    let mut averages = BTreeMap::new();
    for (name, column) in all_metrics() {
        if table.has_column(column) {
            let values = present(table, column);
            let avg = if values.is_empty() { None } else { safe(mean(&values)) };
            averages.insert(format!("avg_{name}"), avg);
        }
    }

    Summary {
        generated_at: Utc::now(),
        total_cars: table.len(),
        total_brands: brands.len(),
        price_min: prices.iter().cloned().reduce(f64::min).and_then(safe),
        price_max: prices.iter().cloned().reduce(f64::max).and_then(safe),
        price_median: median(&prices).and_then(safe),
        price_std: sample_stddev(&prices).and_then(safe),
        p75_performance: p75(table, "INDEX_PERFORMANCE"),
        p75_safety: p75(table, "INDEX_SAFETY"),
        p75_comfort: p75(table, "INDEX_COMFORT"),
        averages,
    }
}
