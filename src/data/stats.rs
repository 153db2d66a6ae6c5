// ============================================================
// Layer 4 — Statistics
// ============================================================
// Read-only aggregates over the current table. Nothing here
// changes the dataset.
//
//   describe  quick summary shown between filter steps
//   analyze   the full "what is available" report used to pick
//             restriction thresholds and stored as
//             original_stats in a restriction profile

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::data::grouping::{basket_sizes, user_basket_counts};
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::Dataset;
use crate::domain::error::Result;
use crate::domain::order_key::OrderKey;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub records:               usize,
    pub users:                 usize,
    /// Distinct (user, basket) pairs
    pub baskets:               usize,
    pub mean_baskets_per_user: f64,
    pub mean_items_per_basket: f64,
    /// None when no product column is present
    pub products:              Option<usize>,
}

pub fn describe(dataset: &Dataset, columns: &ColumnSpec) -> Result<Stats> {
    columns.require_basket(dataset)?;
    let (user, basket) = (columns.user.as_str(), columns.basket.as_str());

    let users    = dataset.distinct(user)?.len();
    let baskets  = basket_sizes(dataset, user, basket)?.len();
    let products = match columns.find_product(dataset) {
        Some(p) => Some(dataset.distinct(p)?.len()),
        None    => None,
    };

    Ok(Stats {
        records:               dataset.len(),
        users,
        baskets,
        mean_baskets_per_user: ratio(baskets, users),
        mean_items_per_basket: ratio(dataset.len(), baskets),
        products,
    })
}

/// Original dataset characteristics, one block per limitation type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnalysis {
    // Customer count
    pub max_customers:           usize,

    // Shopping frequency (distinct baskets per customer)
    pub max_orders_per_customer: usize,
    pub min_orders_per_customer: usize,
    pub avg_orders_per_customer: f64,

    // Basket depth (items per basket)
    pub max_basket_depth:        usize,
    pub min_basket_depth:        usize,
    pub avg_basket_depth:        f64,

    // Product variety
    pub max_products:            usize,

    // Temporal depth (distinct basket ids across all users)
    pub max_temporal_periods:    usize,

    pub total_transactions:      usize,
    pub total_orders:            usize,
}

pub fn analyze(dataset: &Dataset, columns: &ColumnSpec) -> Result<DatasetAnalysis> {
    columns.require_basket(dataset)?;
    columns.require_product(dataset)?;
    let (user, basket) = (columns.user.as_str(), columns.basket.as_str());

    if dataset.is_empty() {
        tracing::debug!("analyze: empty dataset");
        return Ok(DatasetAnalysis::default());
    }

    let orders = user_basket_counts(dataset, user, basket)?;
    let depths = basket_sizes(dataset, user, basket)?;
    let periods: HashSet<OrderKey> = dataset
        .distinct(basket)?
        .iter()
        .map(|b| OrderKey::parse(b))
        .collect();

    Ok(DatasetAnalysis {
        max_customers:           orders.len(),
        max_orders_per_customer: orders.iter().copied().max().unwrap_or(0),
        min_orders_per_customer: orders.iter().copied().min().unwrap_or(0),
        avg_orders_per_customer: round2(ratio(orders.iter().sum(), orders.len())),
        max_basket_depth:        depths.iter().copied().max().unwrap_or(0),
        min_basket_depth:        depths.iter().copied().min().unwrap_or(0),
        avg_basket_depth:        round2(ratio(depths.iter().sum(), depths.len())),
        max_products:            dataset.distinct(&columns.product)?.len(),
        max_temporal_periods:    periods.len(),
        total_transactions:      dataset.len(),
        total_orders:            depths.len(),
    })
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::transactions;

    fn sample() -> Dataset {
        transactions(&[
            ("a", "1", "x"), ("a", "1", "y"), ("a", "2", "x"),
            ("b", "1", "z"),
        ])
    }

    #[test]
    fn test_describe_counts() {
        let s = describe(&sample(), &ColumnSpec::default()).unwrap();
        assert_eq!(s.records, 4);
        assert_eq!(s.users, 2);
        // (a,1), (a,2), (b,1): basket "1" counted once per user
        assert_eq!(s.baskets, 3);
        assert!((s.mean_baskets_per_user - 1.5).abs() < 1e-9);
        assert!((s.mean_items_per_basket - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.products, Some(3));
    }

    #[test]
    fn test_describe_without_product_column() {
        let d = Dataset::new(
            vec!["user_id".into(), "order_number".into()],
            vec![vec!["a".into(), "1".into()]],
        )
        .unwrap();
        let s = describe(&d, &ColumnSpec::default()).unwrap();
        assert_eq!(s.products, None);
    }

    #[test]
    fn test_describe_finds_product_alias() {
        let d = Dataset::new(
            vec!["user_id".into(), "order_number".into(), "item_id".into()],
            vec![vec!["a".into(), "1".into(), "i".into()]],
        )
        .unwrap();
        let s = describe(&d, &ColumnSpec::default()).unwrap();
        assert_eq!(s.products, Some(1));
    }

    #[test]
    fn test_describe_does_not_mutate() {
        let d      = sample();
        let before = d.clone();
        describe(&d, &ColumnSpec::default()).unwrap();
        assert_eq!(d, before);
    }

    #[test]
    fn test_describe_empty() {
        let s = describe(&transactions(&[]), &ColumnSpec::default()).unwrap();
        assert_eq!(s.records, 0);
        assert_eq!(s.mean_items_per_basket, 0.0);
    }

    #[test]
    fn test_analyze() {
        let a = analyze(&sample(), &ColumnSpec::default()).unwrap();
        assert_eq!(a.max_customers, 2);
        assert_eq!(a.min_orders_per_customer, 1);
        assert_eq!(a.max_orders_per_customer, 2);
        assert_eq!(a.avg_orders_per_customer, 1.5);
        assert_eq!(a.min_basket_depth, 1);
        assert_eq!(a.max_basket_depth, 2);
        assert_eq!(a.avg_basket_depth, 1.33);
        assert_eq!(a.max_products, 3);
        assert_eq!(a.max_temporal_periods, 2);
        assert_eq!(a.total_transactions, 4);
        assert_eq!(a.total_orders, 3);
    }
}
