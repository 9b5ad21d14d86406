use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub label: String,
    /// Direction of the most recent sort on this column. Starts `false` so the
    /// first sort comes out ascending.
    #[serde(default)]
    pub ascending: bool,
}

/// A header row plus body rows, sortable by column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortableTable {
    pub headers: Vec<Header>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl SortableTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = headers
            .into_iter()
            .map(|label| Header {
                label,
                ascending: false,
            })
            .collect();
        Self { headers, rows }
    }

    /// Parses `{"headers": [...], "rows": [[...], ...]}` with plain string headers.
    pub fn from_json(raw: &str) -> Result<Self> {
        let table: RawTable = serde_json::from_str(raw)?;
        Ok(Self::new(table.headers, table.rows))
    }

    /// Flips the column's direction and stably re-orders the body rows by the
    /// lower-cased cell text. Returns `true` when the new order is ascending.
    pub fn sort_by_column(&mut self, column: usize) -> Result<bool> {
        let columns = self.headers.len();
        let header = self
            .headers
            .get_mut(column)
            .ok_or(AppError::ColumnOutOfRange { column, columns })?;

        // Toggle direction for this header only
        header.ascending = !header.ascending;
        let ascending = header.ascending;

        // Stable sort keeps equal rows in their current order
        self.rows.sort_by(|a, b| {
            let ordering = compare_rows(a, b, column);
            if ascending { ordering } else { ordering.reverse() }
        });

        Ok(ascending)
    }
}

fn sort_key(row: &[String], column: usize) -> String {
    row.get(column).map(|c| c.to_lowercase()).unwrap_or_default()
}

fn compare_rows(a: &[String], b: &[String], column: usize) -> Ordering {
    sort_key(a, column).cmp(&sort_key(b, column))
}
