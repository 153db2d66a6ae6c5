// ============================================================
// Layer 2 — RestrictUseCase
// ============================================================
// Runs a whole restriction pass from a validated plan:
//
//   Step 1: Load history + future files     (Layer 4 - data)
//   Step 2: Merge into one working table    (Layer 4 - data)
//   Step 3: Apply each step in plan order   (Layer 2 - session)
//   Step 4: Split into history / future     (Layer 4 - data)
//   Step 5: Write both outputs              (Layer 6 - infra)
//
// An empty table after Step 3 is not written.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::session::{RestrictionSession, Step, StepReport};
use crate::data::{loader::CsvLoader, sampler::DEFAULT_SEED, splitter::SplitOutcome};
use crate::domain::{columns::ColumnSpec, traits::DatasetSink};
use crate::infra::split_store::SplitStore;

// ─── Restriction Plan ─────────────────────────────────────────────────────────
// Every parameter of one run. Serialisable so a run can be logged
// or stored next to its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictPlan {
    pub history_file: PathBuf,
    /// Optional: a missing future file contributes no records
    pub future_file:  PathBuf,
    pub output_dir:   PathBuf,
    pub name:         String,
    pub columns:      ColumnSpec,
    pub delimiter:    u8,
    pub seed:         u64,
    pub min_users:    usize,
    pub steps:        Vec<Step>,
}

impl Default for RestrictPlan {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from("input/dataset_history.csv"),
            future_file:  PathBuf::from("input/dataset_future.csv"),
            output_dir:   PathBuf::from("output"),
            name:         "restricted".to_string(),
            columns:      ColumnSpec::default(),
            delimiter:    b',',
            seed:         DEFAULT_SEED,
            min_users:    1,
            steps:        Vec::new(),
        }
    }
}

/// Everything a front end needs to report a finished run.
#[derive(Debug)]
pub struct RestrictSummary {
    pub steps:        Vec<StepReport>,
    pub split:        SplitOutcome,
    pub history_path: Option<String>,
    pub future_path:  Option<String>,
}

pub struct RestrictUseCase {
    plan: RestrictPlan,
}

impl RestrictUseCase {
    pub fn new(plan: RestrictPlan) -> Self {
        Self { plan }
    }

    pub fn execute(&self) -> Result<RestrictSummary> {
        let plan = &self.plan;

        // ── Steps 1 + 2: load and merge ───────────────────────────────────────
        let history = CsvLoader::new(&plan.history_file).with_delimiter(plan.delimiter);
        let future  = CsvLoader::new(&plan.future_file)
            .with_delimiter(plan.delimiter)
            .optional();
        let mut session = RestrictionSession::load(&history, &future, plan.columns.clone(), plan.seed)?;

        // ── Step 3: reduce ────────────────────────────────────────────────────
        for step in &plan.steps {
            session.apply(step.clone())?;
        }

        // ── Steps 4 + 5: split and save ───────────────────────────────────────
        let store = SplitStore::new(&plan.output_dir).with_delimiter(plan.delimiter);
        let (split, paths) = finish(&session, &plan.name, plan.min_users, &store)?;

        Ok(RestrictSummary {
            steps:        session.log().to_vec(),
            split,
            history_path: paths.as_ref().map(|p| p.0.clone()),
            future_path:  paths.map(|p| p.1),
        })
    }
}

/// Split the session's table and write both sides, unless the
/// working table is empty. Shared with the interactive front end.
pub fn finish(
    session:   &RestrictionSession,
    name:      &str,
    min_users: usize,
    sink:      &dyn DatasetSink,
) -> Result<(SplitOutcome, Option<(String, String)>)> {
    if session.dataset().is_empty() {
        tracing::warn!("Working table is empty, nothing written for '{}'", name);
        return Ok((session.split(min_users)?, None));
    }

    let split = session.split(min_users)?;
    for diag in split.diagnostics.iter().filter(|d| d.is_defect()) {
        tracing::warn!("Split of '{}': {}", name, diag);
    }

    let paths = sink.write_split(name, &split.history, &split.future)?;
    Ok((split, Some(paths)))
}
