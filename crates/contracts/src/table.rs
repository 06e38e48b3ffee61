//! MergedTable - Merger output
//!
//! Row-oriented synchronized table with a fixed column order.

use serde::{Deserialize, Serialize};

/// One cell of the merged table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric sample
    Number(f64),
    /// Preformatted text (e.g. the `Time` column)
    Text(String),
    /// Missing sample or unmatched row
    Null,
}

impl FieldValue {
    /// Whether the cell is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(Self::Number).unwrap_or(Self::Null)
    }
}

/// Synchronized table: one record per sample of the first series' grid
///
/// Every record has exactly one value per column, so the table shape is
/// uniform even where the second series had no matching sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl MergedTable {
    /// Create an empty table with the given column order
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create an empty table with room for `rows` records
    pub fn with_capacity(columns: Vec<String>, rows: usize) -> Self {
        Self {
            columns,
            rows: Vec::with_capacity(rows),
        }
    }

    /// Append a record.
    ///
    /// # Panics
    /// Panics if the record width differs from the column count.
    pub fn push_row(&mut self, row: Vec<FieldValue>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "record width must match column count"
        );
        self.rows.push(row);
    }

    /// Column names in insertion order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All records
    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(row, column)`
    pub fn value(&self, row: usize, column: &str) -> Option<&FieldValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Iterate one record as `(column, value)` pairs
    pub fn record(&self, row: usize) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.rows.get(row).into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MergedTable {
        let mut table = MergedTable::new(vec!["Time".into(), "csv_Speed".into()]);
        table.push_row(vec![FieldValue::Text("0.000".into()), Some(12.5).into()]);
        table.push_row(vec![FieldValue::Text("0.100".into()), None.into()]);
        table
    }

    #[test]
    fn test_value_lookup() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "csv_Speed"), Some(&FieldValue::Number(12.5)));
        assert!(table.value(1, "csv_Speed").unwrap().is_null());
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.value(5, "Time"), None);
    }

    #[test]
    fn test_record_iteration_preserves_order() {
        let table = table();
        let names: Vec<&str> = table.record(0).map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Time", "csv_Speed"]);
        assert_eq!(table.record(9).count(), 0);
    }

    #[test]
    #[should_panic(expected = "record width")]
    fn test_push_row_width_mismatch() {
        let mut table = MergedTable::new(vec!["Time".into()]);
        table.push_row(vec![]);
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            FieldValue::Number(1.5),
            FieldValue::Text("a".into()),
            FieldValue::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"a",null]"#);
    }
}
