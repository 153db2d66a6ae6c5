// ============================================================
// Layer 1 — Console Reports
// ============================================================
// Everything the tool prints about a dataset. Layers 2–6 hand
// back structured values; this module turns them into text.

use crate::application::profile_use_case::RestrictionProfile;
use crate::application::session::StepReport;
use crate::data::splitter::SplitOutcome;
use crate::data::stats::{DatasetAnalysis, Stats};
use crate::domain::error::Diagnostic;

pub fn print_stats(s: &Stats) {
    if s.records == 0 {
        println!("Dataset is empty!");
        return;
    }

    println!("\n=== Current Dataset Statistics ===");
    println!("Total records: {}", s.records);
    println!("Unique users: {}", s.users);
    println!("Average purchases per user: {:.2}", s.records as f64 / s.users.max(1) as f64);
    println!("Unique baskets: {}", s.baskets);
    println!("Average baskets per user: {:.2}", s.mean_baskets_per_user);
    println!("Average items per basket: {:.2}", s.mean_items_per_basket);
    if let Some(p) = s.products {
        println!("Unique products: {p}");
    }
}

pub fn print_analysis(dataset: &str, a: &DatasetAnalysis) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("Dataset Analysis: {}", dataset.to_uppercase());
    println!("{rule}");
    println!("Total customers: {}", a.max_customers);
    println!(
        "Orders per customer: {}-{} (avg: {})",
        a.min_orders_per_customer, a.max_orders_per_customer, a.avg_orders_per_customer
    );
    println!(
        "Basket depth: {}-{} items (avg: {})",
        a.min_basket_depth, a.max_basket_depth, a.avg_basket_depth
    );
    println!("Product variety: {} unique products", a.max_products);
    println!("Temporal periods: {} unique time periods", a.max_temporal_periods);
    println!("Total transactions: {}", a.total_transactions);
    println!("Total orders: {}", a.total_orders);
}

pub fn print_profile_summary(p: &RestrictionProfile) {
    let r    = &p.restrictions;
    let o    = &p.original_stats;
    let rule = "=".repeat(60);

    println!("\n{rule}");
    println!("RESTRICTION SUMMARY for {}", p.dataset.to_uppercase());
    println!("{rule}");
    println!(
        "Customers: {} / {} ({:.1}%)",
        r.max_customers,
        o.max_customers,
        RestrictionProfile::share(r.max_customers, o.max_customers)
    );
    println!(
        "Min orders per customer: {} (filtering out customers with fewer orders)",
        r.min_orders_per_customer
    );
    println!(
        "Min basket size: {} items (filtering out smaller baskets)",
        r.min_basket_items
    );
    println!(
        "Products: {} / {} ({:.1}%)",
        r.max_products,
        o.max_products,
        RestrictionProfile::share(r.max_products, o.max_products)
    );
    println!(
        "Time periods: {} / {} ({:.1}%)",
        r.max_temporal_periods,
        o.max_temporal_periods,
        RestrictionProfile::share(r.max_temporal_periods, o.max_temporal_periods)
    );
}

pub fn print_step(r: &StepReport) {
    println!(
        "{}: {} -> {} records, {} -> {} users, {} -> {} baskets",
        r.step.describe(),
        r.before.records,
        r.after.records,
        r.before.users,
        r.after.users,
        r.before.baskets,
        r.after.baskets,
    );
}

pub fn print_split(split: &SplitOutcome, paths: Option<&(String, String)>) {
    match paths {
        Some((history, future)) => {
            println!("\nDatasets saved:");
            println!("History: {} ({} records)", history, split.history.len());
            println!("Future: {} ({} records)", future, split.future.len());
        }
        None => println!("\nNothing saved: the working dataset is empty."),
    }

    println!("Users in split: {}", split.users);
    for note in split_notes(split) {
        println!("{note}");
    }
}

/// Why a split lost users or records, and whether it is broken.
fn split_notes(split: &SplitOutcome) -> Vec<String> {
    let mut notes = Vec::new();
    if split.excluded_users > 0 {
        notes.push(format!(
            "Excluded {} users ({} records) with fewer than 2 baskets",
            split.excluded_users, split.excluded_records
        ));
    }
    for d in &split.diagnostics {
        match d {
            Diagnostic::InsufficientUsers { .. } => notes.push(format!("Nothing to split: {d}")),
            _ if d.is_defect()                   => notes.push(format!("WARNING: {d}")),
            _ => {}
        }
    }
    if !split.is_consistent() {
        notes.push("WARNING: history and future do not contain the same users".to_string());
    }
    notes
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::splitter::HistoryFutureSplitter;
    use crate::domain::columns::ColumnSpec;
    use crate::domain::dataset::Dataset;

    fn table(rows: &[[&str; 3]]) -> Dataset {
        Dataset::new(
            vec!["user_id".into(), "order_number".into(), "product_id".into()],
            rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_insufficient_users_is_explained() {
        let d     = table(&[["u", "1", "a"], ["u", "2", "b"]]);
        let split = HistoryFutureSplitter::new(ColumnSpec::default())
            .with_min_users(2)
            .split(&d)
            .unwrap();

        let notes = split_notes(&split);
        assert_eq!(split.users, 0);
        assert!(notes
            .iter()
            .any(|n| n == "Nothing to split: only 1 users have 2+ baskets, at least 2 required"));
    }

    #[test]
    fn test_clean_split_has_no_notes() {
        let d     = table(&[["u", "1", "a"], ["u", "2", "b"]]);
        let split = HistoryFutureSplitter::new(ColumnSpec::default()).split(&d).unwrap();
        assert!(split_notes(&split).is_empty());
    }

    #[test]
    fn test_excluded_users_are_reported() {
        let d     = table(&[["u", "1", "a"], ["u", "2", "b"], ["v", "1", "a"]]);
        let split = HistoryFutureSplitter::new(ColumnSpec::default()).split(&d).unwrap();
        assert_eq!(
            split_notes(&split),
            vec!["Excluded 1 users (1 records) with fewer than 2 baskets".to_string()]
        );
    }
}
