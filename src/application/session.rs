// ============================================================
// Layer 2 — Restriction Session
// ============================================================
// Owns the working dataset for one run and exposes the same
// set of capabilities to every front end:
//
//   apply(Step)  → sample users / filter by counts / restrict
//                  the assortment / restrict temporal depth
//   stats()      → describe the current table
//   split()      → history / future outputs
//
// The interactive menu and the flag-driven `restrict` command
// both drive a session; neither calls Layer 4 directly.
//
// A step either succeeds and replaces the working table, or
// fails and leaves it exactly as it was.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::data::{
    assortment::filter_by_assortment,
    cardinality::{filter_baskets_by_depth, filter_users_by_basket_count, filter_users_by_record_count},
    merger::merge,
    sampler::{sample_users, seeded_rng},
    splitter::{HistoryFutureSplitter, SplitOutcome},
    stats::{describe, Stats},
    temporal::filter_by_temporal_depth,
};
use crate::domain::{columns::ColumnSpec, dataset::Dataset, traits::DatasetSource};

/// One data-reduction operation with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    SampleUsers   { n: usize },
    BasketCount   { min: usize, max: usize },
    BasketDepth   { min: usize, max: usize },
    RecordCount   { min: usize, max: usize },
    Assortment    { n: usize },
    TemporalDepth { n: usize },
}

impl Step {
    pub fn describe(&self) -> String {
        match self {
            Step::SampleUsers { n }        => format!("sample {n} users"),
            Step::BasketCount { min, max } => format!("{min}-{} baskets per user", bound(*max)),
            Step::BasketDepth { min, max } => format!("{min}-{} items per basket", bound(*max)),
            Step::RecordCount { min, max } => format!("{min}-{} records per user", bound(*max)),
            Step::Assortment { n }         => format!("assortment of {n} products"),
            Step::TemporalDepth { n }      => format!("{n} most recent periods"),
        }
    }
}

fn bound(max: usize) -> String {
    if max == usize::MAX {
        "∞".to_string()
    } else {
        max.to_string()
    }
}

/// What one applied step did to the table.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step:   Step,
    pub before: Stats,
    pub after:  Stats,
}

pub struct RestrictionSession {
    dataset: Dataset,
    columns: ColumnSpec,
    rng:     StdRng,
    log:     Vec<StepReport>,
}

impl RestrictionSession {
    pub fn new(dataset: Dataset, columns: ColumnSpec, seed: u64) -> Self {
        Self {
            dataset,
            columns,
            rng: seeded_rng(seed),
            log: Vec::new(),
        }
    }

    /// Load both inputs and merge them into the working table.
    pub fn load(
        history: &dyn DatasetSource,
        future:  &dyn DatasetSource,
        columns: ColumnSpec,
        seed:    u64,
    ) -> Result<Self> {
        let h = history.load().context("Loading history table")?;
        let f = future.load().context("Loading future table")?;
        let merged = merge(h, f).context("Merging history and future tables")?;

        tracing::info!(
            "Loaded dataset with {} records and {} columns",
            merged.len(),
            merged.columns().len()
        );
        Ok(Self::new(merged, columns, seed))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// Steps applied so far, oldest first.
    pub fn log(&self) -> &[StepReport] {
        &self.log
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(describe(&self.dataset, &self.columns)?)
    }

    pub fn apply(&mut self, step: Step) -> Result<StepReport> {
        let before = self.stats()?;
        let cols   = &self.columns;
        let d      = &self.dataset;

        let next = match &step {
            Step::SampleUsers { n }        => sample_users(d, *n, cols, &mut self.rng),
            Step::BasketCount { min, max } => filter_users_by_basket_count(d, *min, *max, cols),
            Step::BasketDepth { min, max } => filter_baskets_by_depth(d, *min, *max, cols),
            Step::RecordCount { min, max } => filter_users_by_record_count(d, *min, *max, cols),
            Step::Assortment { n }         => filter_by_assortment(d, *n, cols, &mut self.rng),
            Step::TemporalDepth { n }      => filter_by_temporal_depth(d, *n, cols),
        }
        .with_context(|| format!("Cannot apply step: {}", step.describe()))?;

        self.dataset = next;
        let after    = self.stats()?;

        tracing::info!(
            "{}: {} -> {} records, {} -> {} users",
            step.describe(),
            before.records,
            after.records,
            before.users,
            after.users
        );

        let report = StepReport { step, before, after };
        self.log.push(report.clone());
        Ok(report)
    }

    pub fn split(&self, min_users: usize) -> Result<SplitOutcome> {
        Ok(HistoryFutureSplitter::new(self.columns.clone())
            .with_min_users(min_users)
            .split(&self.dataset)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::transactions;
    use crate::data::sampler::DEFAULT_SEED;

    struct InMemory(Dataset);

    impl DatasetSource for InMemory {
        fn load(&self) -> Result<Dataset> {
            Ok(self.0.clone())
        }
    }

    fn session() -> RestrictionSession {
        let history = transactions(&[
            ("a", "1", "x"), ("a", "2", "y"),
            ("b", "1", "x"),
            ("c", "1", "x"), ("c", "2", "y"), ("c", "2", "z"),
        ]);
        let future = transactions(&[("a", "3", "x"), ("b", "2", "y")]);
        RestrictionSession::load(
            &InMemory(history),
            &InMemory(future),
            ColumnSpec::default(),
            DEFAULT_SEED,
        )
        .unwrap()
    }

    #[test]
    fn test_load_merges_both_tables() {
        assert_eq!(session().dataset().len(), 8);
    }

    #[test]
    fn test_apply_records_before_and_after() {
        let mut s = session();
        let r     = s.apply(Step::BasketCount { min: 3, max: 3 }).unwrap();
        assert_eq!(r.before.users, 3);
        assert_eq!(r.after.users, 1);
        assert_eq!(s.log().len(), 1);
    }

    #[test]
    fn test_failed_step_leaves_dataset_unchanged() {
        let mut s  = session();
        let before = s.dataset().clone();
        assert!(s.apply(Step::BasketDepth { min: 5, max: 1 }).is_err());
        assert_eq!(s.dataset(), &before);
        assert!(s.log().is_empty());
    }

    #[test]
    fn test_split_after_filters() {
        let mut s = session();
        s.apply(Step::BasketDepth { min: 1, max: 1 }).unwrap();
        let out = s.split(1).unwrap();
        assert!(out.is_consistent());
        // c's only single-item basket is basket 1, leaving c with one basket
        assert_eq!(out.excluded_users, 1);
    }
}
