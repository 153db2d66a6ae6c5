// ============================================================
// Layer 4 — Merger
// ============================================================
// Concatenates the history and future tables into one working
// table. No deduplication: a record present in both inputs
// appears twice in the output.
//
// Both tables must carry the same SET of columns. If the second
// lists them in a different order, its rows are rearranged into
// the first table's order before the two frames are stacked.
// A blank table (no header at all, as produced by a missing
// optional file) merges as a no-op.

use std::collections::HashSet;

use crate::domain::dataset::Dataset;
use crate::domain::error::{RestrictError, Result};

pub fn merge(first: Dataset, second: Dataset) -> Result<Dataset> {
    if second.is_blank() {
        return Ok(first);
    }
    if first.is_blank() {
        return Ok(second);
    }

    let left_cols  = first.columns();
    let right_cols = second.columns();
    let left:  HashSet<&String> = left_cols.iter().collect();
    let right: HashSet<&String> = right_cols.iter().collect();
    if left != right || left_cols.len() != right_cols.len() {
        return Err(RestrictError::SchemaMismatch {
            left:  left_cols,
            right: right_cols,
        });
    }

    let merged = Dataset::stack(&first, &second)?;
    tracing::debug!("Merged tables: {} records", merged.len());
    Ok(merged)
}
