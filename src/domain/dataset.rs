// ============================================================
// Layer 3 — Dataset
// ============================================================
// The working table: a polars DataFrame whose columns are all
// String. Cells are opaque strings and the core never interprets
// a value except to compare basket identifiers (see OrderKey).
//
// Every filter borrows a Dataset and returns a NEW Dataset.
// Nothing in the core mutates a table in place, so an earlier
// version of the data stays valid for as long as the caller
// keeps it.

use std::collections::HashSet;

use polars::prelude::*;

use crate::domain::error::{RestrictError, Result};

/// One transaction record: one cell per column.
pub type Record = Vec<String>;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Build a dataset from rows, rejecting duplicate column names
    /// and rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Result<Self> {
        let mut seen = HashSet::new();
        for c in &columns {
            if !seen.insert(c.as_str()) {
                return Err(RestrictError::DuplicateColumn(c.clone()));
            }
        }

        if let Some((row, r)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
        {
            return Err(RestrictError::RaggedRow {
                row,
                expected: columns.len(),
                found:    r.len(),
            });
        }

        let series: Vec<Column> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cells: Vec<&str> = rows.iter().map(|r| r[i].as_str()).collect();
                Column::new(name.as_str().into(), cells)
            })
            .collect();

        Ok(Self { frame: DataFrame::new(series)? })
    }

    /// Wrap a frame read from disk: every column cast to String,
    /// header names trimmed.
    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        let columns = frame
            .get_columns()
            .iter()
            .map(|c| {
                let mut c            = c.cast(&DataType::String)?;
                let name: PlSmallStr = c.name().trim().into();
                c.rename(name);
                Ok(c)
            })
            .collect::<PolarsResult<Vec<_>>>()?;
        Ok(Self { frame: DataFrame::new(columns)? })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Same header, no records.
    pub fn cleared(&self) -> Dataset {
        Dataset { frame: self.frame.clear() }
    }

    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// True for a table with neither columns nor rows, e.g. a
    /// missing optional input file.
    pub fn is_blank(&self) -> bool {
        self.frame.width() == 0 && self.frame.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    pub fn require(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(RestrictError::MissingColumn {
                column:    name.to_string(),
                available: self.columns(),
            })
        }
    }

    /// Cells of one column, top to bottom.
    pub fn values(&self, name: &str) -> Result<Vec<&str>> {
        self.require(name)?;
        let cells = self.frame.column(name)?.as_materialized_series().str()?;
        Ok(cells.into_iter().map(|v| v.unwrap_or("")).collect())
    }

    /// Distinct values of one column in first-appearance order.
    pub fn distinct_series(&self, name: &str) -> Result<Series> {
        self.require(name)?;
        let unique = self
            .frame
            .clone()
            .lazy()
            .select([col(name).unique_stable()])
            .collect()?;
        Ok(unique.column(name)?.as_materialized_series().clone())
    }

    pub fn distinct(&self, name: &str) -> Result<Vec<String>> {
        let unique = self.distinct_series(name)?;
        Ok(unique
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("").to_string())
            .collect())
    }

    /// Materialised rows, for writers and tests.
    pub fn rows(&self) -> Result<Vec<Record>> {
        let mut rows = vec![Vec::with_capacity(self.frame.width()); self.len()];
        for column in self.frame.get_columns() {
            let cells = column.as_materialized_series().str()?;
            for (row, cell) in rows.iter_mut().zip(cells.into_iter()) {
                row.push(cell.unwrap_or("").to_string());
            }
        }
        Ok(rows)
    }

    /// A new dataset holding the rows where `predicate` is true, in
    /// their original order.
    pub fn filter(&self, predicate: Expr) -> Result<Dataset> {
        let frame = self.frame.clone().lazy().filter(predicate).collect()?;
        Ok(Dataset { frame })
    }

    /// Like `filter`, with a precomputed row mask.
    pub fn filter_mask(&self, mask: &BooleanChunked) -> Result<Dataset> {
        Ok(Dataset { frame: self.frame.filter(mask)? })
    }

    /// Rows of `first`, then rows of `second` rearranged into the
    /// column order of `first`. Callers check the column sets.
    pub(crate) fn stack(first: &Dataset, second: &Dataset) -> Result<Dataset> {
        let aligned = second.frame.select(first.columns())?;
        Ok(Dataset { frame: first.frame.vstack(&aligned)? })
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

/// `column ∈ values` as a polars predicate.
pub fn is_in_values(column: &str, values: Series) -> Expr {
    col(column).is_in(lit(values), false)
}
