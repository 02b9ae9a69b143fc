//! Raw enriched-table export, one JSON object per car.

use serde_json::{Map, Number, Value};

use crate::normalize::to_numeric;
use crate::table::Table;

/// Converts the enriched table to a list of JSON records.
///
/// A column whose non-empty cells all parse numerically is emitted as
/// numbers; otherwise its cells stay strings. Empty cells become null
/// either way, so missing data is an explicit marker rather than `""` or
/// NaN.
pub fn all_cars(table: &Table) -> Vec<Map<String, Value>> {
    let numeric: Vec<bool> = table
        .headers()
        .iter()
        .map(|h| {
            let col = table.column(h).unwrap_or_default();
            let non_empty: Vec<&str> = col
                .into_iter()
                .filter(|c| !c.trim().is_empty())
                .collect();
            !non_empty.is_empty() && non_empty.iter().all(|&c| to_numeric(c).is_some())
        })
        .collect();

    (0..table.len())
        .map(|row| {
            let mut record = Map::new();
            for (header, is_numeric) in table.headers().iter().zip(&numeric) {
                let cell = table.value(row, header).unwrap_or_default();
                let value = if cell.trim().is_empty() {
                    Value::Null
                } else if *is_numeric {
                    to_numeric(cell)
                        .and_then(Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null)
                } else {
                    Value::String(cell.to_string())
                };
                record.insert(header.clone(), value);
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_columns_become_numbers() {
        let t = Table::from_reader(
            "BRAND,HARGAOTR,SUNROOF\nTOYOTA,200000000,Yes\nHONDA,300000000,\n".as_bytes(),
        )
        .unwrap();
        let cars = all_cars(&t);

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[0]["BRAND"], Value::String("TOYOTA".into()));
        assert_eq!(cars[0]["HARGAOTR"], serde_json::json!(200000000.0));
        assert_eq!(cars[0]["SUNROOF"], Value::String("Yes".into()));
        assert_eq!(cars[1]["SUNROOF"], Value::Null);
    }

    #[test]
    fn test_mixed_column_stays_string() {
        let t = Table::from_reader("A\n1\ntwo\n".as_bytes()).unwrap();
        let cars = all_cars(&t);
        assert_eq!(cars[0]["A"], Value::String("1".into()));
    }

    #[test]
    fn test_output_is_valid_json() {
        let t = Table::from_reader("A,B\n1,x\n,y\n".as_bytes()).unwrap();
        let json = serde_json::to_string(&all_cars(&t)).unwrap();
        assert!(json.contains("null"));
    }
}
