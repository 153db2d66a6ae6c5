// ============================================================
// Layer 4 — Cardinality Filters
// ============================================================
// Three independent range filters, all inclusive on both ends:
//
//   filter_baskets_by_depth       items per (user, basket)
//                                 → keeps/drops whole BASKETS
//
//   filter_users_by_basket_count  distinct baskets per user
//                                 → keeps/drops whole USERS
//
//   filter_users_by_record_count  raw records per user
//                                 → keeps/drops whole USERS
//
// Basket counts are always counted as distinct (user, basket)
// pairs, never as rows. Each filter is idempotent: a second
// application with the same range removes nothing, because
// every surviving group already satisfies the range and the
// counts of surviving groups do not change.

use crate::data::grouping::{
    basket_size_per_row, check_range, empty_passthrough, user_baskets_per_row, user_records_per_row,
    within,
};
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::Dataset;
use crate::domain::error::Result;

pub fn filter_baskets_by_depth(
    dataset:   &Dataset,
    min_items: usize,
    max_items: usize,
    columns:   &ColumnSpec,
) -> Result<Dataset> {
    check_range("items per basket", min_items, max_items)?;
    columns.require_basket(dataset)?;
    if let Some(d) = empty_passthrough(dataset, "filter_baskets_by_depth") {
        return Ok(d);
    }

    let size = basket_size_per_row(&columns.user, &columns.basket);
    let out  = dataset.filter(within(size, min_items, max_items))?;

    tracing::debug!(
        "Basket depth {}-{}: {} -> {} records",
        min_items, max_items, dataset.len(), out.len()
    );
    Ok(out)
}

pub fn filter_users_by_basket_count(
    dataset:     &Dataset,
    min_baskets: usize,
    max_baskets: usize,
    columns:     &ColumnSpec,
) -> Result<Dataset> {
    check_range("baskets per user", min_baskets, max_baskets)?;
    columns.require_basket(dataset)?;
    if let Some(d) = empty_passthrough(dataset, "filter_users_by_basket_count") {
        return Ok(d);
    }

    let count = user_baskets_per_row(&columns.user, &columns.basket);
    let out   = dataset.filter(within(count, min_baskets, max_baskets))?;

    tracing::debug!(
        "Baskets per user {}-{}: {} -> {} records",
        min_baskets, max_baskets, dataset.len(), out.len()
    );
    Ok(out)
}

pub fn filter_users_by_record_count(
    dataset:     &Dataset,
    min_records: usize,
    max_records: usize,
    columns:     &ColumnSpec,
) -> Result<Dataset> {
    check_range("records per user", min_records, max_records)?;
    columns.require_user(dataset)?;
    if let Some(d) = empty_passthrough(dataset, "filter_users_by_record_count") {
        return Ok(d);
    }

    let count = user_records_per_row(&columns.user);
    let out   = dataset.filter(within(count, min_records, max_records))?;

    tracing::debug!(
        "Records per user {}-{}: {} -> {} records",
        min_records, max_records, dataset.len(), out.len()
    );
    Ok(out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{transactions, triples};
    use crate::domain::error::RestrictError;

    #[test]
    fn test_depth_keeps_only_baskets_in_range() {
        // baskets of size 1, 2 and 4
        let d = transactions(&[
            ("u", "1", "a"),
            ("u", "2", "a"), ("u", "2", "b"),
            ("v", "1", "a"), ("v", "1", "b"), ("v", "1", "c"), ("v", "1", "d"),
        ]);
        let out = filter_baskets_by_depth(&d, 2, 3, &ColumnSpec::default()).unwrap();
        assert_eq!(
            triples(&out),
            vec![
                ("u".into(), "2".into(), "a".into()),
                ("u".into(), "2".into(), "b".into()),
            ]
        );
    }

    #[test]
    fn test_depth_keys_baskets_by_user_and_id() {
        // basket "1" exists for two users with different sizes
        let d = transactions(&[
            ("u", "1", "a"),
            ("v", "1", "a"), ("v", "1", "b"),
        ]);
        let out = filter_baskets_by_depth(&d, 2, 2, &ColumnSpec::default()).unwrap();
        assert_eq!(out.distinct("user_id").unwrap(), vec!["v"]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_basket_count_counts_distinct_baskets_not_rows() {
        // u: one basket with 3 rows; v: 2 baskets with 1 row each
        let d = transactions(&[
            ("u", "1", "a"), ("u", "1", "b"), ("u", "1", "c"),
            ("v", "1", "a"), ("v", "2", "a"),
        ]);
        let out = filter_users_by_basket_count(&d, 2, 5, &ColumnSpec::default()).unwrap();
        assert_eq!(out.distinct("user_id").unwrap(), vec!["v"]);
    }

    #[test]
    fn test_basket_count_is_idempotent() {
        let d = transactions(&[
            ("a", "1", "x"), ("a", "2", "x"), ("a", "3", "x"),
            ("b", "1", "x"),
            ("c", "1", "x"), ("c", "2", "y"), ("c", "2", "z"),
        ]);
        let cols  = ColumnSpec::default();
        let once  = filter_users_by_basket_count(&d, 2, 2, &cols).unwrap();
        let twice = filter_users_by_basket_count(&once, 2, 2, &cols).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.distinct("user_id").unwrap(), vec!["c"]);
    }

    #[test]
    fn test_unbounded_max() {
        let d = transactions(&[("u", "1", "a"), ("u", "2", "a"), ("v", "1", "a")]);
        let out = filter_users_by_basket_count(&d, 2, usize::MAX, &ColumnSpec::default()).unwrap();
        assert_eq!(out.distinct("user_id").unwrap(), vec!["u"]);
    }

    #[test]
    fn test_record_count_counts_rows() {
        let d = transactions(&[
            ("u", "1", "a"), ("u", "1", "b"), ("u", "1", "c"),
            ("v", "1", "a"), ("v", "2", "a"),
        ]);
        let out = filter_users_by_record_count(&d, 3, 3, &ColumnSpec::default()).unwrap();
        assert_eq!(out.distinct("user_id").unwrap(), vec!["u"]);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let d   = transactions(&[("u", "1", "a")]);
        let err = filter_baskets_by_depth(&d, 3, 2, &ColumnSpec::default()).unwrap_err();
        assert!(matches!(err, RestrictError::InvalidRange { min: 3, max: 2, .. }));
    }

    #[test]
    fn test_empty_dataset_passes_through() {
        let d    = transactions(&[]);
        let cols = ColumnSpec::default();
        for out in [
            filter_baskets_by_depth(&d, 1, 2, &cols).unwrap(),
            filter_users_by_basket_count(&d, 1, 2, &cols).unwrap(),
            filter_users_by_record_count(&d, 1, 2, &cols).unwrap(),
        ] {
            assert!(out.is_empty());
            assert_eq!(out.columns(), d.columns());
        }
    }

    #[test]
    fn test_missing_basket_column_aborts() {
        let d    = transactions(&[("u", "1", "a")]);
        let cols = ColumnSpec::new("user_id", "basket_id", "product_id");
        let err  = filter_baskets_by_depth(&d, 1, 2, &cols).unwrap_err();
        assert!(matches!(err, RestrictError::MissingColumn { column, .. } if column == "basket_id"));
    }
}
