// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The core only ever sees an in-memory Dataset. Where that
// table comes from and where the split results go are behind
// these two traits:
//
//   - CsvLoader       implements DatasetSource  (Layer 4)
//   - SplitStore      implements DatasetSink    (Layer 6)
//
// Tests plug in-memory implementations into the same seams.

use anyhow::Result;

use crate::domain::dataset::Dataset;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can produce a transaction table.
pub trait DatasetSource {
    fn load(&self) -> Result<Dataset>;
}

// ─── DatasetSink ──────────────────────────────────────────────────────────────
/// Anything that can persist a pair of history/future outputs
/// under a dataset name.
pub trait DatasetSink {
    /// Write both outputs and return a human-readable location
    /// for each (history first, then future).
    fn write_split(&self, name: &str, history: &Dataset, future: &Dataset)
        -> Result<(String, String)>;
}
