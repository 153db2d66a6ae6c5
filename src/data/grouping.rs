// ============================================================
// Layer 4 — Grouping Helpers
// ============================================================
// Shared group-by counts used by the filters and statistics.
// Baskets are always keyed by the (user, basket) pair, because
// basket ids are only unique within one user.
//
// The `*_per_row` expressions are window functions: every row
// carries the count of the group it belongs to, so a filter can
// compare it against a range without a join.

use polars::prelude::*;

use crate::domain::dataset::Dataset;
use crate::domain::error::{Diagnostic, RestrictError, Result};

const COUNT: &str = "__count";

/// Records in this row's (user, basket).
pub(crate) fn basket_size_per_row(user: &str, basket: &str) -> Expr {
    col(basket).len().over([col(user), col(basket)])
}

/// Distinct baskets of this row's user.
pub(crate) fn user_baskets_per_row(user: &str, basket: &str) -> Expr {
    col(basket).n_unique().over([col(user)])
}

/// Records of this row's user.
pub(crate) fn user_records_per_row(user: &str) -> Expr {
    col(user).len().over([col(user)])
}

/// `min <= expr <= max`
pub(crate) fn within(expr: Expr, min: usize, max: usize) -> Expr {
    expr.clone()
        .gt_eq(lit(min as u64))
        .and(expr.lt_eq(lit(max as u64)))
}

/// Records per (user, basket), one entry per basket.
pub(crate) fn basket_sizes(d: &Dataset, user: &str, basket: &str) -> Result<Vec<usize>> {
    group_counts(d, &[user, basket], col(basket).len())
}

/// Distinct baskets per user, one entry per user.
pub(crate) fn user_basket_counts(d: &Dataset, user: &str, basket: &str) -> Result<Vec<usize>> {
    group_counts(d, &[user], col(basket).n_unique())
}

fn group_counts(d: &Dataset, keys: &[&str], agg: Expr) -> Result<Vec<usize>> {
    let grouped = d
        .frame()
        .clone()
        .lazy()
        .group_by_stable(keys.iter().map(|k| col(*k)).collect::<Vec<_>>())
        .agg([agg.cast(DataType::UInt64).alias(COUNT)])
        .collect()?;

    let counts = grouped.column(COUNT)?.as_materialized_series().u64()?;
    Ok(counts.into_iter().map(|c| c.unwrap_or(0) as usize).collect())
}

pub(crate) fn check_range(what: &'static str, min: usize, max: usize) -> Result<()> {
    if min > max {
        return Err(RestrictError::InvalidRange { what, min, max });
    }
    Ok(())
}

/// Returns the input unchanged (and logs why) when it has no rows.
pub(crate) fn empty_passthrough(d: &Dataset, operation: &'static str) -> Option<Dataset> {
    if d.is_empty() {
        tracing::warn!("{}", Diagnostic::EmptyDataset { operation });
        return Some(d.clone());
    }
    None
}
