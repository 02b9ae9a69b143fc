//! Read-only aggregate queries over the enriched table.
//!
//! Every function here is a pure reduction: it takes the freshly loaded
//! table, computes one result, and hands back a JSON-serializable
//! structure. Non-finite floats are squeezed out through [`utility::safe`]
//! before anything crosses the serialization boundary.

pub mod brand;
pub mod cars;
pub mod correlation;
pub mod distribution;
pub mod summary;
pub mod types;
pub mod utility;

/// Composite index metrics: short name paired with the enriched column.
pub const INDEX_METRICS: &[(&str, &str)] = &[
    ("performance", "INDEX_PERFORMANCE"),
    ("efficiency", "INDEX_EFFICIENCY"),
    ("safety", "INDEX_SAFETY"),
    ("comfort", "INDEX_COMFORT"),
    ("tech", "INDEX_TECH"),
    ("space", "INDEX_SPACE"),
    ("popularity", "INDEX_POPULARITY"),
    ("price", "INDEX_PRICE"),
];

/// Marketing score metrics, present when the scores pipeline produced the
/// table.
pub const SCORE_METRICS: &[(&str, &str)] = &[
    ("score_feature", "SCORE_FEATURE"),
    ("score_safety", "SCORE_SAFETY"),
    ("score_performance", "SCORE_PERFORMANCE"),
    ("score_popularity", "SCORE_POPULARITY"),
    ("score_value", "SCORE_VALUE"),
];

/// All metric columns, either pipeline.
pub fn all_metrics() -> impl Iterator<Item = (&'static str, &'static str)> {
    INDEX_METRICS.iter().chain(SCORE_METRICS).copied()
}
