//! Results cursor.

use crate::row::{ColumnInfo, Row};
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// An iterator-like handle over a query's result rows.
///
/// Produced by a driver statement's execution; ownership transfers to the
/// caller that issued the query. Rows share one `ColumnInfo`.
#[derive(Debug)]
pub struct Cursor {
    columns: Arc<ColumnInfo>,
    rows: VecDeque<Row>,
}

impl Cursor {
    /// Create a cursor from column names and row values.
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let columns = Arc::new(ColumnInfo::new(column_names));
        let rows = rows
            .into_iter()
            .map(|values| Row::with_columns(Arc::clone(&columns), values))
            .collect();
        Self { columns, rows }
    }

    /// Create a cursor with no columns and no rows.
    ///
    /// Statements that produce no result set (DDL, INSERT without
    /// RETURNING) yield this.
    pub fn empty() -> Self {
        Self {
            columns: Arc::new(ColumnInfo::new(Vec::new())),
            rows: VecDeque::new(),
        }
    }

    /// Get the column metadata for this result set.
    pub fn columns(&self) -> &ColumnInfo {
        &self.columns
    }

    /// Number of rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Check if all rows have been fetched.
    pub fn is_exhausted(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fetch the next row, if any.
    pub fn next_row(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    /// Fetch all remaining rows at once.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cursor {
        Cursor::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Value::Int(1), Value::Text("Alice".to_string())],
                vec![Value::Int(2), Value::Text("Bob".to_string())],
            ],
        )
    }

    #[test]
    fn fetch_in_order() {
        let mut cursor = sample();
        assert_eq!(cursor.remaining(), 2);

        let first = cursor.next_row().unwrap();
        assert_eq!(first.get_named::<i32>("id").unwrap(), 1);

        let second = cursor.next_row().unwrap();
        assert_eq!(second.get_named::<String>("name").unwrap(), "Bob");

        assert!(cursor.next_row().is_none());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn rows_share_column_info() {
        let mut cursor = sample();
        let a = cursor.next_row().unwrap();
        let b = cursor.next_row().unwrap();
        assert!(Arc::ptr_eq(&a.column_info(), &b.column_info()));
    }

    #[test]
    fn iterator_and_fetch_all() {
        let ids: Vec<i32> = sample().map(|row| row.get_as::<i32>(0).unwrap()).collect();
        assert_eq!(ids, vec![1, 2]);

        let mut cursor = sample();
        assert_eq!(cursor.fetch_all().len(), 2);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn empty_cursor() {
        let mut cursor = Cursor::empty();
        assert!(cursor.is_exhausted());
        assert!(cursor.columns().is_empty());
        assert!(cursor.next_row().is_none());
    }
}
