//! Data tables attached to steps

use crate::{Result, TableError};
use serde::{Deserialize, Serialize};

/// A rectangular grid of string cells.
///
/// Every row has the same number of cells; construction rejects ragged input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDataTable")]
pub struct DataTable {
    rows: Vec<Vec<String>>,
}

// Deserialized rows are validated by `DataTable::new`.
#[derive(Deserialize)]
struct RawDataTable {
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawDataTable> for DataTable {
    type Error = TableError;

    fn try_from(raw: RawDataTable) -> Result<Self> {
        DataTable::new(raw.rows)
    }
}

impl DataTable {
    /// Build a table from rows of cells.
    pub fn new(rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != expected)
            {
                return Err(TableError::Ragged {
                    row,
                    expected,
                    actual: cells.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Build a table from anything string-like.
    pub fn from_cells<R, C>(rows: R) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Owned copy of the cells.
    pub fn raw(&self) -> Vec<Vec<String>> {
        self.rows.clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New table with `f` applied to every cell, row by row.
    pub fn map<F>(&self, mut f: F) -> DataTable
    where
        F: FnMut(&str) -> String,
    {
        DataTable {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| f(cell)).collect())
                .collect(),
        }
    }

    /// New table with rows and columns swapped.
    pub fn transpose(&self) -> DataTable {
        let rows = (0..self.column_count())
            .map(|col| self.rows.iter().map(|row| row[col].clone()).collect())
            .collect();
        DataTable { rows }
    }

    pub fn is_data_table(&self) -> bool {
        true
    }

    pub fn is_doc_string(&self) -> bool {
        false
    }
}
