// ============================================================
// Layer 4 — Temporal Depth Filter
// ============================================================
// Basket identifiers double as time periods: basket 7 of any
// user was placed in "period 7". This filter keeps the records
// of the `max_periods` most recent periods (compared through
// OrderKey) and drops everything older.
//
// Because a period IS a basket id, a basket is always kept or
// dropped as a whole.

use std::collections::BTreeSet;

use polars::prelude::{NamedFrom, Series};

use crate::data::grouping::empty_passthrough;
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::{is_in_values, Dataset};
use crate::domain::error::Result;
use crate::domain::order_key::OrderKey;

pub fn filter_by_temporal_depth(
    dataset:     &Dataset,
    max_periods: usize,
    columns:     &ColumnSpec,
) -> Result<Dataset> {
    dataset.require(&columns.basket)?;
    if let Some(d) = empty_passthrough(dataset, "filter_by_temporal_depth") {
        return Ok(d);
    }

    let ids = dataset.distinct(&columns.basket)?;
    let periods: BTreeSet<OrderKey> = ids.iter().map(|b| OrderKey::parse(b)).collect();

    // Oldest kept period; everything at or after it survives
    let Some(cutoff) = periods.iter().rev().take(max_periods).last().cloned() else {
        tracing::debug!("Temporal depth 0: dropping all {} records", dataset.len());
        return Ok(dataset.cleared());
    };

    let recent: Vec<&str> = ids
        .iter()
        .filter(|b| OrderKey::parse(b) >= cutoff)
        .map(String::as_str)
        .collect();
    let out = dataset.filter(is_in_values(&columns.basket, Series::new("recent".into(), recent)))?;

    tracing::debug!(
        "Temporal depth {} of {} periods (from {}): {} -> {} records",
        max_periods.min(periods.len()),
        periods.len(),
        cutoff,
        dataset.len(),
        out.len()
    );
    Ok(out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::transactions;

    #[test]
    fn test_keeps_most_recent_periods_numerically() {
        let d = transactions(&[
            ("u", "9", "a"), ("u", "10", "b"), ("u", "11", "c"),
            ("v", "2", "a"), ("v", "10", "a"),
        ]);
        let out = filter_by_temporal_depth(&d, 2, &ColumnSpec::default()).unwrap();
        assert_eq!(out.values("order_number").unwrap(), vec!["10", "11", "10"]);
    }

    #[test]
    fn test_more_periods_than_available_keeps_everything() {
        let d   = transactions(&[("u", "1", "a"), ("u", "2", "b")]);
        let out = filter_by_temporal_depth(&d, 50, &ColumnSpec::default()).unwrap();
        assert_eq!(out, d);
    }

    #[test]
    fn test_zero_periods_keeps_nothing() {
        let d   = transactions(&[("u", "1", "a")]);
        let out = filter_by_temporal_depth(&d, 0, &ColumnSpec::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), d.columns());
    }

    #[test]
    fn test_empty_dataset_passes_through() {
        let d   = transactions(&[]);
        let out = filter_by_temporal_depth(&d, 3, &ColumnSpec::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), d.columns());
    }

    #[test]
    fn test_missing_basket_column_aborts() {
        let d    = transactions(&[("u", "1", "a")]);
        let cols = ColumnSpec::new("user_id", "basket_id", "product_id");
        assert!(filter_by_temporal_depth(&d, 1, &cols).is_err());
    }
}
