// Test-only builders for small transaction tables.

use crate::domain::dataset::Dataset;

/// A (user_id, order_number, product_id) table from string triples.
pub(crate) fn transactions(rows: &[(&str, &str, &str)]) -> Dataset {
    Dataset::new(
        vec!["user_id".into(), "order_number".into(), "product_id".into()],
        rows.iter()
            .map(|(u, b, p)| vec![u.to_string(), b.to_string(), p.to_string()])
            .collect(),
    )
    .expect("fixture rows are well formed")
}

/// Sorted (user, basket, product) triples, for order-insensitive comparisons.
pub(crate) fn triples(d: &Dataset) -> Vec<(String, String, String)> {
    let mut out: Vec<_> = d
        .rows()
        .expect("fixture tables hold string cells")
        .into_iter()
        .map(|r| (r[0].clone(), r[1].clone(), r[2].clone()))
        .collect();
    out.sort();
    out
}
