//! The two enrichment pipelines.
//!
//! Both start from the merged, price-filtered table and append computed
//! columns: `indices` derives eight unbounded z-score composite indices,
//! `scores` derives five bounded 0-10 marketing scores. They are kept as
//! independent, selectable variants.

pub mod indices;
pub mod scores;

use anyhow::Result;
use clap::ValueEnum;
use tracing::info;

use crate::merge::{SALES_COLUMN, merge_sales};
use crate::normalize::to_numeric;
use crate::table::Table;

/// Which set of derived columns the ETL run appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Pipeline {
    /// Eight z-score composite indices (`INDEX_*`).
    Indices,
    /// Five bounded 0-10 marketing scores (`SCORE_*`).
    Scores,
}

/// Runs the full batch pipeline: merge specs with sales, filter on price,
/// append the selected derived columns. The result is the enriched table,
/// the sole durable artifact every query reads from.
pub fn run(specs: Table, sales: Table, pipeline: Pipeline) -> Result<Table> {
    let mut table = merge_sales(specs, sales)?;

    match pipeline {
        Pipeline::Indices => indices::calculate_indices(&mut table)?,
        Pipeline::Scores => scores::calculate_scores(&mut table)?,
    }

    info!(rows = table.len(), ?pipeline, "pipeline run complete");
    Ok(table)
}

/// Default airbag count assumed when the cell is missing or unparseable.
pub(crate) const DEFAULT_AIRBAGS: f64 = 2.0;

/// Airbag counts per row, defaulting when the column or cell is absent.
pub(crate) fn airbag_counts(table: &Table) -> Vec<f64> {
    match table.numeric_column("AIRBAGS") {
        Some(col) => col.iter().map(|v| v.unwrap_or(DEFAULT_AIRBAGS)).collect(),
        None => vec![DEFAULT_AIRBAGS; table.len()],
    }
}

/// Per-row count of affirmative flags across the configured columns,
/// silently skipping columns the dataset does not carry.
pub(crate) fn feature_points(table: &Table, flags: &[&str]) -> Vec<f64> {
    let mut points = vec![0.0; table.len()];
    for &flag in flags {
        if let Some(col) = table.column(flag) {
            for (p, cell) in points.iter_mut().zip(col) {
                *p += crate::normalize::has_feature(cell) as f64;
            }
        }
    }
    points
}

/// Units sold per row. The merge step guarantees the column exists with 0
/// for unmatched rows; unparseable cells also read as 0.
pub(crate) fn sales_counts(table: &Table) -> Vec<f64> {
    table
        .numeric_column(SALES_COLUMN)
        .map(|col| col.iter().map(|v| v.unwrap_or(0.0)).collect())
        .unwrap_or_else(|| vec![0.0; table.len()])
}

/// Numeric column with missing cells coerced to 0.
pub(crate) fn numeric_or_zero(table: &Table, name: &str) -> Vec<f64> {
    match table.column(name) {
        Some(col) => col.iter().map(|&c| to_numeric(c).unwrap_or(0.0)).collect(),
        None => vec![0.0; table.len()],
    }
}
