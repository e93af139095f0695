//! Minimal column-oriented table for heterogeneous JSON payloads.
//!
//! The public feeds return arrays of flat JSON objects whose key sets are not
//! fixed. [`Frame`] keeps those rows as-is under an ordered column list so the
//! reshaping and renaming steps can work on column names before anything is
//! deserialized into a typed struct.
//!
//! Column order is first-seen order across the input records; a record that
//! lacks a column gets `null` in that cell.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, TseError};

/// A `(from, to)` column rename table. Unmapped columns pass through.
pub type ColumnRenames<'a> = &'a [(&'a str, &'a str)];

/// Ordered columns plus row-major cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Empty frame with a fixed schema.
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a frame from JSON objects.
    ///
    /// Fails with [`TseError::MalformedResponse`] if any record is not an object.
    pub fn from_records(records: &[Value]) -> Result<Self> {
        let mut frame = Self::default();
        let mut objects = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let obj = record
                .as_object()
                .ok_or_else(|| TseError::MalformedResponse(format!("record {i} is not an object")))?;
            for key in obj.keys() {
                if frame.column_index(key).is_none() {
                    frame.columns.push(key.clone());
                }
            }
            objects.push(obj);
        }
        for obj in objects {
            let row = frame
                .columns
                .iter()
                .map(|c| obj.get(c).cloned().unwrap_or(Value::Null))
                .collect();
            frame.rows.push(row);
        }
        Ok(frame)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Append a row; its width must match the schema.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TseError::InvalidParameter(format!(
                "row has {} cells, frame has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Rename columns in place. Every key present in the table is renamed;
    /// everything else is untouched.
    pub fn rename(&mut self, renames: ColumnRenames<'_>) {
        for column in &mut self.columns {
            if let Some((_, to)) = renames.iter().find(|(from, _)| *from == column.as_str()) {
                *column = (*to).to_string();
            }
        }
    }

    /// Project onto `columns` (in that order), optionally renaming each one.
    ///
    /// Columns absent from the frame come out as all-`null`.
    pub fn select_as<S: AsRef<str>>(&self, columns: &[(S, S)]) -> Frame {
        let indices: Vec<Option<usize>> =
            columns.iter().map(|(src, _)| self.column_index(src.as_ref())).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Frame { columns: columns.iter().map(|(_, dst)| dst.as_ref().to_string()).collect(), rows }
    }

    /// Append a column holding the same value in every row.
    pub fn with_constant(mut self, name: &str, value: Value) -> Frame {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(value.clone());
        }
        self
    }

    /// Stack frames vertically, keeping input order.
    ///
    /// The result schema is the union of all columns in first-seen order;
    /// cells for columns a frame does not have are `null`.
    pub fn concat(frames: Vec<Frame>) -> Frame {
        let mut columns: Vec<String> = Vec::new();
        for frame in &frames {
            for c in &frame.columns {
                if !columns.contains(c) {
                    columns.push(c.clone());
                }
            }
        }
        let mut out = Frame::new(columns);
        for frame in frames {
            let mapping: Vec<Option<usize>> =
                out.columns.iter().map(|c| frame.column_index(c)).collect();
            for row in frame.rows {
                let cells = mapping
                    .iter()
                    .map(|i| i.and_then(|i| row.get(i).cloned()).unwrap_or(Value::Null))
                    .collect();
                out.rows.push(cells);
            }
        }
        out
    }

    /// Rows as JSON objects (column name → cell).
    pub fn records(&self) -> impl Iterator<Item = Map<String, Value>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect::<Map<String, Value>>()
        })
    }

    /// Deserialize every row into `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.records()
            .enumerate()
            .map(|(i, rec)| {
                serde_json::from_value(Value::Object(rec))
                    .map_err(|e| TseError::MalformedResponse(format!("row {i}: {e}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_records_unions_columns() {
        let frame = Frame::from_records(&[json!({"a": 1, "b": 2}), json!({"b": 3, "c": 4})]).unwrap();
        assert_eq!(frame.columns(), ["a", "b", "c"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(1, "a"), Some(&Value::Null));
        assert_eq!(frame.get(1, "c"), Some(&json!(4)));
    }

    #[test]
    fn non_object_record_is_malformed() {
        let err = Frame::from_records(&[json!([1, 2])]).unwrap_err();
        assert!(matches!(err, TseError::MalformedResponse(_)));
    }

    #[test]
    fn rename_is_total_on_present_keys() {
        let mut frame = Frame::from_records(&[json!({"x": 1, "y": 2, "z": 3})]).unwrap();
        frame.rename(&[("x", "ex"), ("z", "zed"), ("missing", "nope")]);
        assert_eq!(frame.columns(), ["ex", "y", "zed"]);
    }

    #[test]
    fn concat_outer_joins_schema() {
        let a = Frame::from_records(&[json!({"k": 1, "a": "x"})]).unwrap();
        let b = Frame::from_records(&[json!({"k": 2, "b": "y"})]).unwrap();
        let out = Frame::concat(vec![a, b]);
        assert_eq!(out.columns(), ["k", "a", "b"]);
        assert_eq!(out.rows()[0], vec![json!(1), json!("x"), Value::Null]);
        assert_eq!(out.rows()[1], vec![json!(2), Value::Null, json!("y")]);
    }

    #[test]
    fn push_row_checks_width() {
        let mut frame = Frame::new(vec!["a".into()]);
        assert!(frame.push_row(vec![json!(1)]).is_ok());
        assert!(frame.push_row(vec![json!(1), json!(2)]).is_err());
    }

    #[test]
    fn to_typed_deserializes_rows() {
        #[derive(serde::Deserialize)]
        struct Row {
            a: i64,
        }
        let frame = Frame::from_records(&[json!({"a": 7}), json!({"a": 9})]).unwrap();
        let rows: Vec<Row> = frame.to_typed().unwrap();
        assert_eq!(rows.iter().map(|r| r.a).sum::<i64>(), 16);
    }
}
