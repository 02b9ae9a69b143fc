//! Joins the specification sheet with the wholesale sales sheet.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::normalize::to_numeric;
use crate::table::Table;

/// Natural-key columns shared by both input sheets.
pub const KEY_COLUMNS: &[&str] = &["BRAND", "MODEL", "VARIAN"];
/// On-the-road list price, in rupiah.
pub const PRICE_COLUMN: &str = "HARGAOTR";
/// Total units sold in the reporting period.
pub const SALES_COLUMN: &str = "TOTAL_2025";

/// Uppercases and trims the natural-key columns in place so the join is
/// insensitive to casing and stray whitespace.
fn normalize_keys(table: &mut Table, which: &str) -> Result<()> {
    for &key in KEY_COLUMNS {
        let Some(col) = table.column(key) else {
            bail!("{which} sheet is missing key column {key:?}");
        };
        let cleaned = col
            .iter()
            .map(|v| v.trim().to_uppercase())
            .collect();
        table.set_column(key, cleaned)?;
    }
    Ok(())
}

fn key_of(table: &Table, row: usize) -> (String, String, String) {
    (
        table.value(row, "BRAND").unwrap_or_default().to_string(),
        table.value(row, "MODEL").unwrap_or_default().to_string(),
        table.value(row, "VARIAN").unwrap_or_default().to_string(),
    )
}

/// Left-joins sales onto specs on (BRAND, MODEL, VARIAN) and applies the
/// hard price filter.
///
/// Spec rows with no sales match get `TOTAL_2025 = 0`. Rows whose price is
/// missing, non-numeric, or not strictly positive are dropped; the dropped
/// count is logged but never fatal.
pub fn merge_sales(mut specs: Table, mut sales: Table) -> Result<Table> {
    normalize_keys(&mut specs, "specs")?;
    normalize_keys(&mut sales, "sales")?;

    if !sales.has_column(SALES_COLUMN) {
        bail!("sales sheet is missing column {SALES_COLUMN:?}");
    }

    // Duplicate keys in the sales sheet: last row wins.
    let mut totals: HashMap<(String, String, String), f64> = HashMap::new();
    for row in 0..sales.len() {
        let total = sales
            .value(row, SALES_COLUMN)
            .and_then(to_numeric)
            .unwrap_or(0.0);
        totals.insert(key_of(&sales, row), total);
    }

    let joined: Vec<String> = (0..specs.len())
        .map(|row| {
            totals
                .get(&key_of(&specs, row))
                .copied()
                .unwrap_or(0.0)
                .to_string()
        })
        .collect();
    specs.push_column(SALES_COLUMN, joined)?;

    let prices = specs
        .numeric_column(PRICE_COLUMN)
        .with_context(|| format!("specs sheet is missing column {PRICE_COLUMN:?}"))?;

    let keep: Vec<bool> = prices.iter().map(|p| matches!(p, Some(v) if *v > 0.0)).collect();
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped > 0 {
        warn!(dropped, "dropped rows with missing or non-positive price");
    }
    specs.retain_rows(&keep);

    info!(
        rows = specs.len(),
        matched_sales = totals.len(),
        "merged specs with sales"
    );

    Ok(specs)
}
