// ============================================================
// Layer 4 — History/Future Splitter
// ============================================================
// Partitions each user's records into:
//   - Future:  the user's most recent basket (highest basket id)
//   - History: every other basket of that user
//
// Steps:
//   1. Count distinct baskets per user. Users with fewer than
//      2 baskets cannot give up a future basket and still keep
//      a history, so they are excluded from BOTH outputs.
//   2. If fewer than `min_users` users remain, both outputs are
//      empty and InsufficientUsers is reported.
//   3. For each remaining user, find the maximum OrderKey among
//      their basket ids. If several raw ids share it ("3" and
//      "03"), all of them go to future and TiedMaxBasket is
//      reported for that user.
//   4. Route every record: max basket → future, else → history.
//   5. Verify set(history users) == set(future users). A
//      difference is reported as UserSetMismatch with both
//      one-sided user lists. The outputs are returned as-is.
//
// No randomness: the same input always produces the same two
// tables, with records in their original relative order.

use std::collections::{BTreeSet, HashMap, HashSet};

use polars::prelude::BooleanChunked;

use crate::data::cardinality::filter_users_by_basket_count;
use crate::domain::columns::ColumnSpec;
use crate::domain::dataset::Dataset;
use crate::domain::error::{Diagnostic, Result};
use crate::domain::order_key::OrderKey;

/// Result of a split. `diagnostics` must be checked by callers:
/// the split is only trustworthy when `is_consistent()` holds.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub history:          Dataset,
    pub future:           Dataset,
    /// Users present in the outputs
    pub users:            usize,
    pub excluded_users:   usize,
    pub excluded_records: usize,
    pub diagnostics:      Vec<Diagnostic>,
}

impl SplitOutcome {
    fn empty(dataset: &Dataset, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            history:          dataset.cleared(),
            future:           dataset.cleared(),
            users:            0,
            excluded_users:   0,
            excluded_records: 0,
            diagnostics,
        }
    }

    /// False when history and future disagree on their users.
    pub fn is_consistent(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UserSetMismatch { .. }))
    }
}

pub struct HistoryFutureSplitter {
    columns:   ColumnSpec,
    min_users: usize,
}

impl HistoryFutureSplitter {
    pub fn new(columns: ColumnSpec) -> Self {
        Self { columns, min_users: 1 }
    }

    /// Minimum number of users with 2+ baskets required to split at all.
    pub fn with_min_users(mut self, min_users: usize) -> Self {
        self.min_users = min_users;
        self
    }

    pub fn split(&self, dataset: &Dataset) -> Result<SplitOutcome> {
        let (user, basket) = (self.columns.user.as_str(), self.columns.basket.as_str());
        self.columns.require_basket(dataset)?;

        if dataset.is_empty() {
            let diag = Diagnostic::EmptyDataset { operation: "split" };
            tracing::warn!("{diag}");
            return Ok(SplitOutcome::empty(dataset, vec![diag]));
        }

        let mut diagnostics = Vec::new();

        // ── Step 1: exclude users with fewer than 2 baskets ─────────────────
        let eligible = filter_users_by_basket_count(dataset, 2, usize::MAX, &self.columns)?;
        let n_all    = dataset.distinct(user)?.len();
        let n_kept   = eligible.distinct(user)?.len();

        let excluded_users   = n_all - n_kept;
        let excluded_records = dataset.len() - eligible.len();

        if excluded_users > 0 {
            let diag = Diagnostic::ExcludedUsers { users: excluded_users, records: excluded_records };
            tracing::warn!("{diag}");
            diagnostics.push(diag);
        }

        // ── Step 2: enough users left? ──────────────────────────────────────
        if n_kept < self.min_users {
            let diag = Diagnostic::InsufficientUsers {
                eligible: n_kept,
                required: self.min_users,
            };
            tracing::warn!("{diag}");
            diagnostics.push(diag);

            let mut out = SplitOutcome::empty(dataset, diagnostics);
            out.excluded_users   = excluded_users;
            out.excluded_records = excluded_records;
            return Ok(out);
        }

        // ── Step 3: most recent basket per eligible user ────────────────────
        let users   = eligible.values(user)?;
        let baskets = eligible.values(basket)?;

        let mut ids: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for (u, b) in users.iter().zip(&baskets) {
            ids.entry(*u).or_default().insert(*b);
        }

        let mut latest: HashMap<&str, OrderKey> = HashMap::with_capacity(ids.len());
        let mut order: Vec<&str> = ids.keys().copied().collect();
        order.sort_unstable();
        for u in order {
            let own = &ids[u];
            let Some(max) = own.iter().map(|b| OrderKey::parse(b)).max() else {
                continue;
            };

            let tied: Vec<String> = own
                .iter()
                .filter(|b| OrderKey::parse(b) == max)
                .map(|b| b.to_string())
                .collect();
            if tied.len() > 1 {
                let diag = Diagnostic::TiedMaxBasket { user: u.to_string(), baskets: tied };
                tracing::warn!("{diag}");
                diagnostics.push(diag);
            }

            latest.insert(u, max);
        }

        // ── Step 4: route records ───────────────────────────────────────────
        let is_future: BooleanChunked = users
            .iter()
            .zip(&baskets)
            .map(|(u, b)| latest.get(u).is_some_and(|max| OrderKey::parse(b) == *max))
            .collect();

        let future  = eligible.filter_mask(&is_future)?;
        let history = eligible.filter_mask(&!&is_future)?;

        // ── Step 5: verify matched user sets ────────────────────────────────
        let history_users: HashSet<String> = history.distinct(user)?.into_iter().collect();
        let future_users:  HashSet<String> = future.distinct(user)?.into_iter().collect();
        if history_users != future_users {
            let mut only_in_history: Vec<String> =
                history_users.difference(&future_users).cloned().collect();
            let mut only_in_future: Vec<String> =
                future_users.difference(&history_users).cloned().collect();
            only_in_history.sort();
            only_in_future.sort();

            let diag = Diagnostic::UserSetMismatch { only_in_history, only_in_future };
            tracing::warn!("{diag}");
            diagnostics.push(diag);
        }
        let n_users = history_users.union(&future_users).count();

        tracing::info!(
            "Split {} users: {} history records, {} future records",
            n_users,
            history.len(),
            future.len()
        );

        Ok(SplitOutcome {
            users: n_users,
            history,
            future,
            excluded_users,
            excluded_records,
            diagnostics,
        })
    }
}

/// Split with the default minimum of one eligible user.
pub fn split_history_future(dataset: &Dataset, columns: &ColumnSpec) -> Result<SplitOutcome> {
    HistoryFutureSplitter::new(columns.clone()).split(dataset)
}
