//! Group-by-brand rollup.

use std::collections::BTreeMap;

use crate::analytics::all_metrics;
use crate::analytics::types::BrandAggregate;
use crate::analytics::utility::safe;
use crate::merge::{PRICE_COLUMN, SALES_COLUMN};
use crate::normalize::mean;
use crate::table::Table;

/// Rolls the enriched table up to one row per brand: mean price, mean of
/// every metric column present, summed sales, and model count.
///
/// Brands come out in sorted order, so repeated calls over the same table
/// produce identical output.
pub fn brand_analysis(table: &Table) -> Vec<BrandAggregate> {
    let mut rows_by_brand: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    if let Some(brands) = table.column("BRAND") {
        for (row, brand) in brands.into_iter().enumerate() {
            rows_by_brand.entry(brand.to_string()).or_default().push(row);
        }
    }

    let prices = table.numeric_column(PRICE_COLUMN);
    let sales = table.numeric_column(SALES_COLUMN);
    let metrics: Vec<(&str, Vec<Option<f64>>)> = all_metrics()
        .filter_map(|(name, column)| Some((name, table.numeric_column(column)?)))
        .collect();

    rows_by_brand
        .into_iter()
        .map(|(brand, rows)| {
            let pick = |col: &Option<Vec<Option<f64>>>| -> Vec<f64> {
                col.as_ref()
                    .map(|c| rows.iter().filter_map(|&r| c[r]).collect())
                    .unwrap_or_default()
            };

            let brand_prices = pick(&prices);
            let avg_price_otr = if brand_prices.is_empty() {
                None
            } else {
                safe(mean(&brand_prices))
            };

            let mut averages = BTreeMap::new();
            for (name, column) in &metrics {
                let values: Vec<f64> = rows.iter().filter_map(|&r| column[r]).collect();
                let avg = if values.is_empty() { None } else { safe(mean(&values)) };
                averages.insert(format!("avg_{name}"), avg);
            }

            let total_sales = pick(&sales).iter().sum();

            BrandAggregate {
                brand,
                avg_price_otr,
                averages,
                total_sales,
                total_models: rows.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> Table {
        Table::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_rollup_by_brand() {
        let t = table(
            "BRAND,MODEL,VARIAN,HARGAOTR,TOTAL_2025,INDEX_PERFORMANCE\n\
             TOYOTA,AVANZA,G,200,100,1.0\n\
             TOYOTA,INNOVA,V,400,50,3.0\n\
             HONDA,BRIO,RS,300,25,0.5\n",
        );
        let rollup = brand_analysis(&t);

        assert_eq!(rollup.len(), 2);
        // sorted by brand
        assert_eq!(rollup[0].brand, "HONDA");
        assert_eq!(rollup[1].brand, "TOYOTA");

        let toyota = &rollup[1];
        assert_eq!(toyota.total_models, 2);
        assert_eq!(toyota.total_sales, 150.0);
        assert_eq!(toyota.avg_price_otr, Some(300.0));
        assert_eq!(toyota.averages.get("avg_performance"), Some(&Some(2.0)));
    }

    #[test]
    fn test_brand_with_no_sales_matches() {
        let t = table(
            "BRAND,MODEL,VARIAN,HARGAOTR,TOTAL_2025\nX,A,1,300,0\nX,B,1,500,0\n",
        );
        let rollup = brand_analysis(&t);
        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].total_models, 2);
        assert_eq!(rollup[0].total_sales, 0.0);
    }

    #[test]
    fn test_stable_across_calls() {
        let t = table(
            "BRAND,MODEL,VARIAN,HARGAOTR,TOTAL_2025\nZETA,A,1,100,1\nALFA,B,1,200,2\nMID,C,1,300,3\n",
        );
        let first: Vec<String> = brand_analysis(&t).into_iter().map(|b| b.brand).collect();
        let second: Vec<String> = brand_analysis(&t).into_iter().map(|b| b.brand).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["ALFA", "MID", "ZETA"]);
    }
}
