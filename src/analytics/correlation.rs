//! Pairwise Pearson correlation matrix.

use crate::analytics::all_metrics;
use crate::analytics::types::CorrelationMatrix;
use crate::analytics::utility::{pearson, round3};
use crate::merge::PRICE_COLUMN;
use crate::table::Table;

/// Raw numeric columns always considered alongside the metric columns.
const RAW_CANDIDATES: &[&str] = &[PRICE_COLUMN, "HORSE POWER (HP)", "TORQUE (Nm)"];

/// Correlates every candidate column present in the table against every
/// other, rounded to three decimals. The `columns` list matches the matrix
/// row and column order; undefined correlations (zero variance, too few
/// complete pairs) are null.
pub fn correlation_matrix(table: &Table) -> CorrelationMatrix {
    let candidates: Vec<&str> = RAW_CANDIDATES
        .iter()
        .copied()
        .chain(all_metrics().map(|(_, column)| column))
        .filter(|&c| table.has_column(c))
        .collect();

    let series: Vec<Vec<Option<f64>>> = candidates
        .iter()
        .map(|&c| table.numeric_column(c).unwrap_or_default())
        .collect();

    let matrix = series
        .iter()
        .map(|xs| {
            series
                .iter()
                .map(|ys| pearson(xs, ys).map(round3))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: candidates.into_iter().map(String::from).collect(),
        matrix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let t = table(
            "BRAND,HARGAOTR,HORSE POWER (HP),INDEX_PERFORMANCE\n\
             A,200,100,0.4\nB,400,150,1.1\nC,300,90,-0.2\n",
        );
        let corr = correlation_matrix(&t);

        let n = corr.columns.len();
        assert_eq!(n, 3);
        assert_eq!(corr.matrix.len(), n);
        for (i, row) in corr.matrix.iter().enumerate() {
            assert_eq!(row.len(), n);
            assert_eq!(row[i], Some(1.0));
            for j in 0..n {
                assert_eq!(row[j], corr.matrix[j][i]);
            }
        }
    }

    #[test]
    fn test_skips_absent_columns() {
        let t = table("BRAND,HARGAOTR\nA,200\nB,400\n");
        let corr = correlation_matrix(&t);
        assert_eq!(corr.columns, vec!["HARGAOTR"]);
        assert_eq!(corr.matrix, vec![vec![Some(1.0)]]);
    }

    #[test]
    fn test_constant_column_is_null() {
        let t = table("BRAND,HARGAOTR,HORSE POWER (HP)\nA,200,100\nB,400,100\n");
        let corr = correlation_matrix(&t);
        // hp has zero variance: every correlation involving it is null
        let hp = corr.columns.iter().position(|c| c == "HORSE POWER (HP)").unwrap();
        assert!(corr.matrix[hp].iter().all(Option::is_none));
    }

    #[test]
    fn test_rounded_to_three_decimals() {
        let t = table("BRAND,HARGAOTR,HORSE POWER (HP)\nA,200,103\nB,410,151\nC,305,98\n");
        let corr = correlation_matrix(&t);
        for row in &corr.matrix {
            for cell in row.iter().flatten() {
                assert!(((cell * 1000.0).round() - cell * 1000.0).abs() < 1e-9);
            }
        }
    }
}
