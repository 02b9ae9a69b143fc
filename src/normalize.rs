//! Pure numeric and categorical transforms shared by both pipelines.

/// Coerces a raw cell to a number. Trims whitespace; anything that does not
/// parse as `f64` (including the empty string) is missing.
pub fn to_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Standardizes a column: `(x - mean) / std` over the present values.
///
/// Missing entries stay missing. When the standard deviation is zero or
/// undefined (constant column, no data) every entry becomes `Some(0.0)` so
/// the column can never contribute NaN or infinity downstream.
pub fn zscore(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    let m = mean(&present);
    let sd = stddev(&present, m);

    if present.is_empty() || sd == 0.0 {
        return vec![Some(0.0); values.len()];
    }

    values.iter().map(|v| v.map(|x| (x - m) / sd)).collect()
}

/// Standardizes a dense column (no missing entries).
pub fn zscore_dense(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = stddev(values, m);

    if sd == 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|x| (x - m) / sd).collect()
}

/// Values treated as an affirmative feature flag, lowercase.
const AFFIRMATIVE: &[&str] = &[
    "yes", "1", "ada", "true", "lengkap", "electric", "wireless", "wired",
];

/// Maps a raw feature cell to 1 (present) or 0 (absent).
///
/// Case-insensitive exact match against the affirmative set, plus a "yes"
/// substring match to catch compound cells like "Yes (Front & Rear)".
/// Everything else, including the empty cell, is 0.
pub fn has_feature(raw: &str) -> u32 {
    let s = raw.trim().to_lowercase();
    if AFFIRMATIVE.contains(&s.as_str()) {
        return 1;
    }
    if s.contains("yes") {
        return 1;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_to_numeric() {
        assert_eq!(to_numeric("42"), Some(42.0));
        assert_eq!(to_numeric(" 3.5 "), Some(3.5));
        assert_eq!(to_numeric(""), None);
        assert_eq!(to_numeric("n/a"), None);
        assert_eq!(to_numeric("1,200"), None);
    }

    #[test]
    fn test_zscore_mean_zero_std_one() {
        let input: Vec<Option<f64>> = vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)];
        let z: Vec<f64> = zscore(&input).into_iter().map(|v| v.unwrap()).collect();

        let m = mean(&z);
        let sd = stddev(&z, m);
        assert!(m.abs() < EPS);
        assert!((sd - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zscore_skips_missing() {
        let input = vec![Some(1.0), None, Some(3.0)];
        let z = zscore(&input);
        assert!(z[1].is_none());
        // mean 2, population std 1
        assert!((z[0].unwrap() + 1.0).abs() < EPS);
        assert!((z[2].unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_zscore_constant_column_is_all_zero() {
        let input = vec![Some(5.0), Some(5.0), None, Some(5.0)];
        let z = zscore(&input);
        assert_eq!(z, vec![Some(0.0); 4]);
    }

    #[test]
    fn test_zscore_empty_and_all_missing() {
        assert!(zscore(&[]).is_empty());
        assert_eq!(zscore(&[None, None]), vec![Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_zscore_dense_matches_option_path() {
        let dense = zscore_dense(&[1.0, 2.0, 3.0]);
        let sparse = zscore(&[Some(1.0), Some(2.0), Some(3.0)]);
        for (d, s) in dense.iter().zip(sparse) {
            assert!((d - s.unwrap()).abs() < EPS);
        }
    }

    #[test]
    fn test_has_feature_affirmatives() {
        for v in ["yes", "YES", "Yes", "1", "Ada", "TRUE", "lengkap", "Electric", "wireless", "Wired"] {
            assert_eq!(has_feature(v), 1, "expected {v:?} to be affirmative");
        }
    }

    #[test]
    fn test_has_feature_substring_yes() {
        assert_eq!(has_feature("Yes (Front & Rear)"), 1);
        assert_eq!(has_feature("2 airbags, yes"), 1);
    }

    #[test]
    fn test_has_feature_negatives() {
        for v in ["no", "", "0", "false", "tidak", "  "] {
            assert_eq!(has_feature(v), 0, "expected {v:?} to be negative");
        }
    }
}
