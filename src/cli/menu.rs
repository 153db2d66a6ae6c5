// ============================================================
// Layer 1 — Interactive Menu
// ============================================================
// Prompt loop over a RestrictionSession, built on inquire:
//   - Select      for the menu and the dataset choice
//   - CustomType  for numbers, validated against a range
//   - Text        for the output name
//
// Esc / Ctrl-C at the top-level menu leaves without saving.
// A step that fails is reported and the menu comes back with
// the dataset unchanged.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use inquire::{validator::Validation, CustomType, InquireError, Select, Text};

use crate::application::profile_use_case::Restrictions;
use crate::application::restrict_use_case::finish;
use crate::application::session::{RestrictionSession, Step};
use crate::cli::report::{print_split, print_stats, print_step};
use crate::data::stats::DatasetAnalysis;
use crate::infra::split_store::SplitStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    SampleUsers,
    BasketCount,
    BasketDepth,
    Assortment,
    TemporalDepth,
    Stats,
    SaveAndExit,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 8] = [
        MenuItem::SampleUsers,
        MenuItem::BasketCount,
        MenuItem::BasketDepth,
        MenuItem::Assortment,
        MenuItem::TemporalDepth,
        MenuItem::Stats,
        MenuItem::SaveAndExit,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuItem::SampleUsers   => "Sample random users",
            MenuItem::BasketCount   => "Filter by basket count per user (min-max)",
            MenuItem::BasketDepth   => "Filter by items per basket (min-max)",
            MenuItem::Assortment    => "Restrict product assortment",
            MenuItem::TemporalDepth => "Keep most recent time periods",
            MenuItem::Stats         => "Show current dataset statistics",
            MenuItem::SaveAndExit   => "Save and exit",
            MenuItem::Exit          => "Exit without saving",
        };
        f.write_str(label)
    }
}

pub struct MenuOptions<'a> {
    pub output_dir: &'a Path,
    pub delimiter:  u8,
    pub min_users:  usize,
}

pub fn run_menu(mut session: RestrictionSession, opts: MenuOptions<'_>) -> Result<()> {
    loop {
        let choice = match Select::new("NBR Restrictor — choose an option:", MenuItem::ALL.to_vec()).prompt() {
            Ok(c) => c,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                println!("Exiting without saving.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let step = match choice {
            MenuItem::Stats => {
                print_stats(&session.stats()?);
                continue;
            }
            MenuItem::Exit => {
                println!("Exiting without saving.");
                return Ok(());
            }
            MenuItem::SaveAndExit => {
                if save(&session, &opts)? {
                    return Ok(());
                }
                continue;
            }
            other => match prompt_step(&session, other)? {
                Some(step) => step,
                None => continue,
            },
        };

        match session.apply(step) {
            Ok(report) => print_step(&report),
            Err(e)     => println!("{e:#}"),
        }
    }
}

/// Ask for the parameters of a filter step. None when there is
/// nothing to filter.
fn prompt_step(session: &RestrictionSession, item: MenuItem) -> Result<Option<Step>> {
    let stats = session.stats()?;
    if stats.records == 0 {
        println!("Dataset is empty!");
        return Ok(None);
    }

    let step = match item {
        MenuItem::SampleUsers => {
            println!("Current users: {}", stats.users);
            let n = prompt_in_range("How many users to keep?", 1, stats.users)?;
            Step::SampleUsers { n }
        }
        MenuItem::BasketCount => {
            print_stats(&stats);
            let (min, max) = prompt_range("baskets per user")?;
            Step::BasketCount { min, max }
        }
        MenuItem::BasketDepth => {
            print_stats(&stats);
            let (min, max) = prompt_range("items per basket")?;
            Step::BasketDepth { min, max }
        }
        MenuItem::Assortment => {
            let available = stats.products.unwrap_or(0);
            if available == 0 {
                println!("Column '{}' not found in dataset!", session.columns().product);
                return Ok(None);
            }
            println!("Current products: {available}");
            let n = prompt_in_range("How many products to keep?", 1, available)?;
            Step::Assortment { n }
        }
        MenuItem::TemporalDepth => {
            let n = prompt_in_range("How many recent time periods to keep?", 1, usize::MAX)?;
            Step::TemporalDepth { n }
        }
        MenuItem::Stats | MenuItem::SaveAndExit | MenuItem::Exit => return Ok(None),
    };
    Ok(Some(step))
}

/// Returns true once the split has been written.
fn save(session: &RestrictionSession, opts: &MenuOptions<'_>) -> Result<bool> {
    if session.dataset().is_empty() {
        println!("Cannot save empty dataset!");
        return Ok(false);
    }

    let name = Text::new("Enter dataset name (e.g., 'tafeng_few_customers'):")
        .with_validator(|s: &str| {
            if s.trim().is_empty() {
                Ok(Validation::Invalid("Dataset name cannot be empty!".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;

    let store          = SplitStore::new(opts.output_dir).with_delimiter(opts.delimiter);
    let (split, paths) = finish(session, name.trim(), opts.min_users, &store)?;
    print_split(&split, paths.as_ref());
    print_stats(&session.stats()?);
    println!("Done!");
    Ok(true)
}

pub fn prompt_in_range(message: &str, min: usize, max: usize) -> Result<usize> {
    let help = if max == usize::MAX {
        format!("at least {min}")
    } else {
        format!("{min}-{max}")
    };
    let value = CustomType::<usize>::new(message)
        .with_help_message(&help)
        .with_error_message("Please enter a valid number")
        .with_validator(move |v: &usize| {
            if (min..=max).contains(v) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(format!("Please enter a number in {min}..={max}").into()))
            }
        })
        .prompt()?;
    Ok(value)
}

fn prompt_range(item_name: &str) -> Result<(usize, usize)> {
    let min = prompt_in_range(&format!("Enter minimum {item_name}:"), 1, usize::MAX)?;
    let max = prompt_in_range(&format!("Enter maximum {item_name}:"), min, usize::MAX)?;
    Ok((min, max))
}

/// Ask for all five restriction thresholds, each bounded by what
/// the analysis found.
pub fn prompt_restrictions(dataset: &str, a: &DatasetAnalysis) -> Result<Restrictions> {
    println!("\nConfigure data limitations for {}", dataset.to_uppercase());
    println!("(Enter values between the minimum and maximum available)");

    println!("\n1. CUSTOMER COUNT — available: {} customers", a.max_customers);
    let max_customers = prompt_in_range("How many customers to keep?", 1, a.max_customers)?;

    println!(
        "\n2. SHOPPING FREQUENCY — available: {}-{} orders per customer",
        a.min_orders_per_customer, a.max_orders_per_customer
    );
    let min_orders_per_customer = prompt_in_range(
        "Minimum orders per customer to keep?",
        a.min_orders_per_customer,
        a.max_orders_per_customer,
    )?;

    println!(
        "\n3. BASKET DEPTH — available: {}-{} items per basket",
        a.min_basket_depth, a.max_basket_depth
    );
    let min_basket_items = prompt_in_range(
        "Minimum items per basket to keep?",
        a.min_basket_depth,
        a.max_basket_depth,
    )?;

    println!("\n4. PRODUCT VARIETY — available: {} unique products", a.max_products);
    let max_products = prompt_in_range("How many products to keep?", 1, a.max_products)?;

    println!("\n5. TEMPORAL DEPTH — available: {} time periods", a.max_temporal_periods);
    let max_temporal_periods = prompt_in_range("How many time periods to keep?", 1, a.max_temporal_periods)?;

    Ok(Restrictions {
        max_customers,
        min_orders_per_customer,
        min_basket_items,
        max_products,
        max_temporal_periods,
    })
}

/// Pick one of the discovered dataset names.
pub fn prompt_dataset(available: Vec<String>) -> Result<String> {
    Ok(Select::new("Select dataset:", available).prompt()?)
}
