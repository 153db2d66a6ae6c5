// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that writes to disk:
//
//   split_store.rs   Split outputs
//                     Writes the history and future tables as
//                     delimited text files named
//                     <name>_history.<ext> / <name>_future.<ext>
//                     with the same header as the input.
//
//   config_store.rs  Restriction profiles
//                     Saves the dataset analysis plus the chosen
//                     restriction thresholds as pretty-printed
//                     JSON, and loads them back so a profile can
//                     be re-applied later.
//
// Reading input tables is Layer 4's job (data::loader).

/// History/future CSV writer
pub mod split_store;

/// Restriction profile JSON persistence
pub mod config_store;
