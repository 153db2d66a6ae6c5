// ============================================================
// Layer 4 — User Sampler
// ============================================================
// Keeps min(n, distinct users) users chosen uniformly at random
// without replacement, together with ALL of their records.
//
// Randomness is always passed in. The injected generator draws
// the seed for polars' `Series::sample_n`, so the same input and
// the same generator state always select the same users. Callers
// that want the default reproducible behaviour use
// `seeded_rng(DEFAULT_SEED)`.

use polars::prelude::Series;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::grouping::empty_passthrough;
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::{is_in_values, Dataset};
use crate::domain::error::Result;

/// Seed used when the caller does not choose one.
pub const DEFAULT_SEED: u64 = 42;

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Pick `n` distinct values of `column` (all of them if `n`
/// exceeds the count). Values are enumerated in first-appearance
/// order before sampling.
pub(crate) fn choose_distinct<R>(dataset: &Dataset, column: &str, n: usize, rng: &mut R) -> Result<Series>
where
    R: Rng + ?Sized,
{
    let values = dataset.distinct_series(column)?;
    let amount = n.min(values.len());
    Ok(values.sample_n(amount, false, false, Some(rng.gen()))?)
}

pub fn sample_users<R>(dataset: &Dataset, n: usize, columns: &ColumnSpec, rng: &mut R) -> Result<Dataset>
where
    R: Rng + ?Sized,
{
    columns.require_user(dataset)?;
    if let Some(d) = empty_passthrough(dataset, "sample_users") {
        return Ok(d);
    }

    let chosen    = choose_distinct(dataset, &columns.user, n, rng)?;
    let n_chosen  = chosen.len();
    let out       = dataset.filter(is_in_values(&columns.user, chosen))?;

    tracing::debug!(
        "Sampled {} users: {} -> {} records",
        n_chosen,
        dataset.len(),
        out.len()
    );
    Ok(out)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{transactions, triples};

    fn sample() -> Dataset {
        transactions(&[
            ("a", "1", "x"), ("a", "1", "y"), ("a", "2", "x"),
            ("b", "1", "z"),
            ("c", "1", "x"), ("c", "2", "y"),
            ("d", "1", "y"), ("d", "1", "z"),
        ])
    }

    #[test]
    fn test_exactly_n_users_when_available() {
        let d   = sample();
        let out = sample_users(&d, 2, &ColumnSpec::default(), &mut seeded_rng(DEFAULT_SEED)).unwrap();
        assert_eq!(out.distinct("user_id").unwrap().len(), 2);
    }

    #[test]
    fn test_n_larger_than_user_count_keeps_everyone() {
        let d   = sample();
        let out = sample_users(&d, 100, &ColumnSpec::default(), &mut seeded_rng(1)).unwrap();
        assert_eq!(out, d);
    }

    #[test]
    fn test_selected_users_keep_full_histories() {
        let d    = sample();
        let out  = sample_users(&d, 2, &ColumnSpec::default(), &mut seeded_rng(7)).unwrap();
        let full = triples(&d);
        let kept = triples(&out);
        for u in out.distinct("user_id").unwrap() {
            let before: Vec<_> = full.iter().filter(|t| t.0 == u).collect();
            let after:  Vec<_> = kept.iter().filter(|t| t.0 == u).collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_same_seed_same_selection() {
        let d = sample();
        let a = sample_users(&d, 2, &ColumnSpec::default(), &mut seeded_rng(DEFAULT_SEED)).unwrap();
        let b = sample_users(&d, 2, &ColumnSpec::default(), &mut seeded_rng(DEFAULT_SEED)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_user_column() {
        let d    = sample();
        let cols = ColumnSpec::new("customer", "order_number", "product_id");
        assert!(sample_users(&d, 1, &cols, &mut seeded_rng(0)).is_err());
    }

    #[test]
    fn test_empty_dataset_passes_through() {
        let d   = transactions(&[]);
        let out = sample_users(&d, 3, &ColumnSpec::default(), &mut seeded_rng(DEFAULT_SEED)).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), d.columns());
    }
}
