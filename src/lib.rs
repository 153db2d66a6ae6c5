//! NBR Restrictor
//!
//! Applies data limitations to Next Basket Prediction datasets
//! (sampling users, bounding basket/user cardinalities, restricting
//! the product assortment and temporal depth) and splits each user's
//! history into a held-out most-recent "future" basket and the rest.
//!
//! ## Layers
//!
//! - `cli`: argument parsing, interactive menu, console output
//! - `application`: restriction session and use cases
//! - `domain`: dataset, column names, errors, source/sink traits
//! - `data`: the filtering and splitting core
//! - `infra`: CSV and JSON persistence

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod infra;

pub use application::session::{RestrictionSession, Step};
pub use data::splitter::{split_history_future, HistoryFutureSplitter, SplitOutcome};
pub use domain::{columns::ColumnSpec, dataset::Dataset, error::{Diagnostic, RestrictError}};
