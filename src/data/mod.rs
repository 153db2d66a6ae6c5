// ============================================================
// Layer 4 — Data Pipeline (the core)
// ============================================================
// Every operation here takes a borrowed Dataset plus a
// ColumnSpec and returns a new Dataset (or a split outcome).
// None of them print, prompt, or touch the filesystem, except
// the loader, which only reads.
//
// The pipeline flows in this order:
//
//   history.csv + future.csv
//       │
//       ▼
//   CsvLoader         → reads each file into a Dataset
//       │
//       ▼
//   merge             → one working table
//       │
//       ▼
//   sample_users / filter_users_by_basket_count /
//   filter_baskets_by_depth / filter_by_assortment /
//   filter_by_temporal_depth   (any order, any number of times)
//       │
//       ▼
//   HistoryFutureSplitter → (history, future)
//
// describe / analyze can be called on the table at any point.
//
// Granularity contract:
//   - user-level filters keep or drop ALL of a user's records
//   - basket-level filters keep or drop ALL of a basket's records
//   - no filter ever truncates a basket

/// Reads delimited text files into a Dataset
pub mod loader;

/// Row-wise concatenation of two same-schema tables
pub mod merger;

/// Seeded random sampling of users
pub mod sampler;

/// Range filters over basket depth and per-user counts
pub mod cardinality;

/// Product-assortment restriction with whole-basket drops
pub mod assortment;

/// Keeps only the most recent basket periods
pub mod temporal;

/// Per-user history / future split
pub mod splitter;

/// Read-only descriptive aggregates
pub mod stats;

mod grouping;

#[cfg(test)]
pub(crate) mod fixtures;
