// ============================================================
// Layer 4 — Assortment Filter
// ============================================================
// Restricts the product assortment in two steps:
//
//   1. sample_assortment       pick min(n, distinct products)
//                              products at random (seeded)
//   2. retain_baskets_within   keep a basket only if EVERY one
//                              of its products is in that set
//
// This is a subset test, not an intersection: one product
// outside the assortment drops the whole basket. A basket is
// either a valid observation or it is gone; it is never
// trimmed down to its in-assortment items. Baskets are keyed
// by (user, basket), same as everywhere else in the core.

use std::collections::HashSet;

use polars::prelude::*;
use rand::Rng;

use crate::data::grouping::empty_passthrough;
use crate::data::sampler::choose_distinct;
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::{is_in_values, Dataset};
use crate::domain::error::Result;

/// Draw the product assortment.
pub fn sample_assortment<R>(
    dataset:    &Dataset,
    n_products: usize,
    columns:    &ColumnSpec,
    rng:        &mut R,
) -> Result<HashSet<String>>
where
    R: Rng + ?Sized,
{
    columns.require_product(dataset)?;
    let chosen = choose_distinct(dataset, &columns.product, n_products, rng)?;
    let set    = chosen
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(set)
}

/// Keep the baskets whose products all lie inside `assortment`.
pub fn retain_baskets_within(
    dataset:    &Dataset,
    assortment: &HashSet<String>,
    columns:    &ColumnSpec,
) -> Result<Dataset> {
    columns.require_basket(dataset)?;
    columns.require_product(dataset)?;
    if let Some(d) = empty_passthrough(dataset, "filter_by_assortment") {
        return Ok(d);
    }

    let products: Vec<&str> = assortment.iter().map(String::as_str).collect();
    let allowed             = Series::new("assortment".into(), products);

    // Number of out-of-assortment records in this row's basket
    let foreign = is_in_values(&columns.product, allowed)
        .not()
        .cast(DataType::UInt32)
        .sum()
        .over([col(columns.user.as_str()), col(columns.basket.as_str())]);

    let out = dataset.filter(foreign.eq(lit(0u32)))?;

    tracing::debug!(
        "Assortment of {} products: {} -> {} records",
        assortment.len(),
        dataset.len(),
        out.len()
    );
    Ok(out)
}

pub fn filter_by_assortment<R>(
    dataset:    &Dataset,
    n_products: usize,
    columns:    &ColumnSpec,
    rng:        &mut R,
) -> Result<Dataset>
where
    R: Rng + ?Sized,
{
    let assortment = sample_assortment(dataset, n_products, columns, rng)?;
    retain_baskets_within(dataset, &assortment, columns)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{transactions, triples};
    use crate::data::sampler::{seeded_rng, DEFAULT_SEED};
    use crate::domain::error::RestrictError;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_foreign_product_drops_the_whole_basket() {
        let d = transactions(&[
            ("u", "1", "a"), ("u", "1", "b"),
            ("u", "2", "a"), ("u", "2", "z"),
        ]);
        let out = retain_baskets_within(&d, &set(&["a", "b"]), &ColumnSpec::default()).unwrap();
        assert_eq!(
            triples(&out),
            vec![
                ("u".into(), "1".into(), "a".into()),
                ("u".into(), "1".into(), "b".into()),
            ]
        );
    }

    #[test]
    fn test_same_basket_id_for_different_users_is_judged_separately() {
        let d = transactions(&[
            ("u", "1", "a"),
            ("v", "1", "z"),
        ]);
        let out = retain_baskets_within(&d, &set(&["a"]), &ColumnSpec::default()).unwrap();
        assert_eq!(out.distinct("user_id").unwrap(), vec!["u"]);
    }

    #[test]
    fn test_sampled_assortment_size() {
        let d = transactions(&[("u", "1", "a"), ("u", "1", "b"), ("u", "2", "c")]);
        let cols = ColumnSpec::default();
        assert_eq!(sample_assortment(&d, 2, &cols, &mut seeded_rng(3)).unwrap().len(), 2);
        assert_eq!(sample_assortment(&d, 10, &cols, &mut seeded_rng(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_retained_baskets_lie_inside_the_sampled_set() {
        let mut rows = Vec::new();
        let ids: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        for (i, id) in ids.iter().enumerate() {
            let user    = if i % 2 == 0 { "u" } else { "v" };
            let product = ["p1", "p2", "p3", "p4", "p5"][i % 5];
            rows.push((user, id.as_str(), product));
            rows.push((user, id.as_str(), "p1"));
        }
        let d    = transactions(&rows);
        let cols = ColumnSpec::default();

        let assortment = sample_assortment(&d, 3, &cols, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        let out        = filter_by_assortment(&d, 3, &cols, &mut seeded_rng(DEFAULT_SEED)).unwrap();

        let before = triples(&d);
        let after  = triples(&out);
        for (u, b, p) in &after {
            assert!(assortment.contains(p));
            // surviving baskets are complete
            let full = before.iter().filter(|t| &t.0 == u && &t.1 == b).count();
            let kept = after.iter().filter(|t| &t.0 == u && &t.1 == b).count();
            assert_eq!(full, kept);
        }
    }

    #[test]
    fn test_empty_dataset_passes_through() {
        let d    = transactions(&[]);
        let cols = ColumnSpec::default();

        let kept = retain_baskets_within(&d, &set(&["a"]), &cols).unwrap();
        assert!(kept.is_empty());
        assert_eq!(kept.columns(), d.columns());

        let sampled = filter_by_assortment(&d, 2, &cols, &mut seeded_rng(DEFAULT_SEED)).unwrap();
        assert!(sampled.is_empty());
        assert_eq!(sampled.columns(), d.columns());
    }

    #[test]
    fn test_missing_product_column_aborts() {
        let d = Dataset::new(
            vec!["user_id".into(), "order_number".into()],
            vec![vec!["u".into(), "1".into()]],
        )
        .unwrap();
        let cols = ColumnSpec::default();

        let err = filter_by_assortment(&d, 1, &cols, &mut seeded_rng(DEFAULT_SEED)).unwrap_err();
        assert!(matches!(err, RestrictError::MissingColumn { column, .. } if column == "product_id"));

        let err = retain_baskets_within(&d, &set(&["a"]), &cols).unwrap_err();
        assert!(matches!(err, RestrictError::MissingColumn { column, .. } if column == "product_id"));
    }
}
