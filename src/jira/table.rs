//! Flattened, row-per-record view of a list of JSON records.
//!
//! Nested objects become dotted column names, so an issue
//! `{"key": "T-1", "fields": {"status": {"name": "Done"}}}` yields the
//! columns `key` and `fields.status.name`. Arrays and scalars are leaves.
//! Columns keep first-seen order across all records; a record that lacks a
//! column gets `null` in that cell.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Column used for records that are not JSON objects.
pub const VALUE_COLUMN: &str = "value";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
  columns: Vec<String>,
  rows: Vec<Vec<Value>>,
}

impl Table {
  /// Flatten `records` into a table with one row per record.
  pub fn from_records(records: &[Value]) -> Self {
    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let flattened: Vec<Vec<(String, Value)>> = records
      .iter()
      .map(|record| {
        let mut cells = Vec::new();
        match record {
          Value::Object(map) => flatten_into("", map, &mut cells),
          other => cells.push((VALUE_COLUMN.to_string(), other.clone())),
        }
        cells
      })
      .collect();

    for cells in &flattened {
      for (name, _) in cells {
        if !index.contains_key(name) {
          index.insert(name.clone(), columns.len());
          columns.push(name.clone());
        }
      }
    }

    let rows = flattened
      .into_iter()
      .map(|cells| {
        let mut row = vec![Value::Null; columns.len()];
        for (name, value) in cells {
          row[index[&name]] = value;
        }
        row
      })
      .collect();

    Self { columns, rows }
  }

  pub fn columns(&self) -> &[String] {
    &self.columns
  }

  pub fn rows(&self) -> &[Vec<Value>] {
    &self.rows
  }

  /// Number of rows.
  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|c| c == name)
  }

  /// Cell at `row` in column `name`. Unknown columns read as `None`.
  #[cfg(test)]
  pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
    let col = self.column_index(name)?;
    self.rows.get(row).and_then(|r| r.get(col))
  }

  /// Project onto `names`, in that order. Columns that don't exist are
  /// filled with `null` so callers can rely on the shape.
  pub fn select(&self, names: &[&str]) -> Table {
    let positions: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();

    let rows = self
      .rows
      .iter()
      .map(|row| {
        positions
          .iter()
          .map(|pos| pos.and_then(|p| row.get(p).cloned()).unwrap_or(Value::Null))
          .collect()
      })
      .collect();

    Table {
      columns: names.iter().map(|n| n.to_string()).collect(),
      rows,
    }
  }
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
  for (key, value) in map {
    let name = if prefix.is_empty() {
      key.clone()
    } else {
      format!("{}.{}", prefix, key)
    };

    match value {
      Value::Object(inner) => flatten_into(&name, inner, out),
      leaf => out.push((name, leaf.clone())),
    }
  }
}
