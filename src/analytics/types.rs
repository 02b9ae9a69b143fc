//! Output structures for the aggregate queries, all JSON-serializable.
//!
//! Floats are `Option<f64>`: `None` is the explicit missing marker that
//! replaces NaN and infinity at the boundary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline KPIs for the whole enriched table.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub total_cars: usize,
    pub total_brands: usize,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub price_median: Option<f64>,
    pub price_std: Option<f64>,
    pub p75_performance: Option<f64>,
    pub p75_safety: Option<f64>,
    pub p75_comfort: Option<f64>,
    /// `avg_<metric>` for every metric column the table carries.
    #[serde(flatten)]
    pub averages: BTreeMap<String, Option<f64>>,
}

/// One price band and the number of cars that fall into it.
#[derive(Debug, Serialize)]
pub struct SegmentCount {
    pub segment: String,
    pub count: usize,
}

/// Per-brand rollup row.
#[derive(Debug, Serialize)]
pub struct BrandAggregate {
    pub brand: String,
    pub avg_price_otr: Option<f64>,
    /// `avg_<metric>` for every metric column the table carries.
    #[serde(flatten)]
    pub averages: BTreeMap<String, Option<f64>>,
    pub total_sales: f64,
    pub total_models: usize,
}

/// Pairwise Pearson correlations with the matching column order.
#[derive(Debug, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}
