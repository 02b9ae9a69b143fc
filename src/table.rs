//! Dynamic tabular data backed by CSV.
//!
//! The spec sheets are wide and sparse: different dataset exports carry
//! different subsets of the feature columns, so rows are kept as string
//! cells under a header index rather than a fixed struct. Every consumer
//! checks column presence explicitly before reading.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::normalize::to_numeric;

/// An in-memory table: ordered headers plus one `Vec<String>` per row.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Table {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Table {
            headers,
            index,
            rows: Vec::new(),
        }
    }

    /// Reads a CSV file into a table. Missing file is a hard error: the
    /// pipeline aborts rather than producing partial output.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open input file {}", path.display()))?;
        Table::from_reader(file)
            .with_context(|| format!("failed to parse CSV {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("CSV has no header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = Table::new(headers);

        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            // Short rows happen in hand-edited sheets; pad so every row
            // has a cell per header. Over-long rows are cut at the header.
            row.resize(table.headers.len(), String::new());
            table.rows.push(row);
        }

        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Cell value at `row` for `name`, if the column exists.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let col = *self.index.get(name)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Whole column as string slices, if present.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let col = *self.index.get(name)?;
        Some(self.rows.iter().map(|r| r[col].as_str()).collect())
    }

    /// Whole column coerced to numeric, non-parseable cells become `None`.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let col = *self.index.get(name)?;
        Some(self.rows.iter().map(|r| to_numeric(&r[col])).collect())
    }

    /// Overwrites every cell of an existing column.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        let Some(&col) = self.index.get(name) else {
            bail!("column {name:?} does not exist");
        };
        if values.len() != self.rows.len() {
            bail!(
                "column {name:?}: {} values for {} rows",
                values.len(),
                self.rows.len()
            );
        }
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[col] = value;
        }
        Ok(())
    }

    /// Appends a computed column. Replaces in place if the name is taken.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if self.has_column(name) {
            return self.set_column(name, values);
        }
        if values.len() != self.rows.len() {
            bail!(
                "column {name:?}: {} values for {} rows",
                values.len(),
                self.rows.len()
            );
        }
        self.index.insert(name.to_string(), self.headers.len());
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Appends a numeric column, formatting finite values and leaving
    /// non-finite ones as empty cells so they read back as missing.
    pub fn push_numeric_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        let cells = values
            .iter()
            .map(|v| if v.is_finite() { v.to_string() } else { String::new() })
            .collect();
        self.push_column(name, cells)
    }

    /// Keeps only the rows whose flag is true. `keep` must match row count.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut it = keep.iter();
        self.rows.retain(|_| *it.next().unwrap_or(&false));
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        self.write(file)
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_reader("A,B,C\n1,x,\n2,y,3.5\n,z,oops\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_from_reader_headers_and_rows() {
        let t = sample();
        assert_eq!(t.headers(), &["A", "B", "C"]);
        assert_eq!(t.len(), 3);
        assert!(t.has_column("B"));
        assert!(!t.has_column("D"));
    }

    #[test]
    fn test_numeric_column_coercion() {
        let t = sample();
        let a = t.numeric_column("A").unwrap();
        assert_eq!(a, vec![Some(1.0), Some(2.0), None]);
        let c = t.numeric_column("C").unwrap();
        assert_eq!(c, vec![None, Some(3.5), None]);
        assert!(t.numeric_column("D").is_none());
    }

    #[test]
    fn test_push_column_and_value() {
        let mut t = sample();
        t.push_column("D", vec!["a".into(), "b".into(), "c".into()])
            .unwrap();
        assert_eq!(t.value(1, "D"), Some("b"));
        assert_eq!(t.headers().last().map(String::as_str), Some("D"));
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let mut t = sample();
        assert!(t.push_column("D", vec!["only one".into()]).is_err());
    }

    #[test]
    fn test_push_numeric_column_hides_non_finite() {
        let mut t = sample();
        t.push_numeric_column("Z", &[1.5, f64::NAN, f64::INFINITY])
            .unwrap();
        let z = t.numeric_column("Z").unwrap();
        assert_eq!(z, vec![Some(1.5), None, None]);
    }

    #[test]
    fn test_retain_rows() {
        let mut t = sample();
        t.retain_rows(&[true, false, true]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.value(1, "B"), Some("z"));
    }

    #[test]
    fn test_short_rows_padded() {
        let t = Table::from_reader("A,B,C\n1\n".as_bytes()).unwrap();
        assert_eq!(t.value(0, "C"), Some(""));
    }

    #[test]
    fn test_write_round_trip() {
        let t = sample();
        let mut buf = Vec::new();
        t.write(&mut buf).unwrap();
        let back = Table::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back.headers(), t.headers());
        assert_eq!(back.len(), t.len());
        assert_eq!(back.value(1, "C"), Some("3.5"));
    }
}
