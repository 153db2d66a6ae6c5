// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//
//   analyze      print what each limitation type has available
//   configure    analyse + prompt for thresholds + save profile
//   apply        re-apply a saved profile
//   restrict     one flag-driven pass: filters → split → save
//   interactive  the same operations, chosen from a menu
//
// Every command that reads transaction files shares ColumnArgs
// (column names and delimiter) through #[command(flatten)].

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::restrict_use_case::RestrictPlan;
use crate::application::session::Step;
use crate::data::sampler::DEFAULT_SEED;
use crate::domain::columns::{ColumnSpec, DEFAULT_BASKET_COL, DEFAULT_PRODUCT_COL, DEFAULT_USER_COL};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show dataset statistics for each limitation type
    Analyze(AnalyzeArgs),

    /// Analyse a dataset, choose restriction thresholds, save them as a profile
    Configure(ConfigureArgs),

    /// Re-apply a saved restriction profile and write history/future files
    Apply(ApplyArgs),

    /// Restrict a dataset in one pass from command-line flags
    Restrict(RestrictArgs),

    /// Restrict a dataset step by step from an interactive menu
    Interactive(InteractiveArgs),
}

/// Column names and field delimiter of the input files.
#[derive(Args, Debug, Clone)]
pub struct ColumnArgs {
    /// Name of the user column
    #[arg(long, default_value = DEFAULT_USER_COL)]
    pub user_col: String,

    /// Name of the basket (order number) column
    #[arg(long, default_value = DEFAULT_BASKET_COL)]
    pub basket_col: String,

    /// Name of the product column
    #[arg(long, default_value = DEFAULT_PRODUCT_COL)]
    pub product_col: String,

    /// Field delimiter: a single ASCII character, or "tab"
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

impl ColumnArgs {
    pub fn spec(&self) -> ColumnSpec {
        ColumnSpec::new(&self.user_col, &self.basket_col, &self.product_col)
    }
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be one ASCII character or 'tab', got '{s}'")),
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory containing <name>_history.csv / <name>_future.csv files
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    /// Dataset name; every dataset found in the input directory if omitted
    #[arg(long)]
    pub dataset: Option<String>,

    /// Print the analysis as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Args, Debug)]
pub struct ConfigureArgs {
    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    /// Directory for the saved profile
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Dataset name; chosen from a menu if omitted
    #[arg(long)]
    pub dataset: Option<String>,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to a <name>_restrictions_config.json profile
    #[arg(long)]
    pub config: PathBuf,

    #[arg(long, default_value = "input")]
    pub input_dir: PathBuf,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Output name; defaults to <dataset>_restricted
    #[arg(long)]
    pub name: Option<String>,

    /// Seed for user and product sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// All arguments for the `restrict` command.
/// Each filter runs only if at least one of its flags is given;
/// filters run in the order they are listed here.
#[derive(Args, Debug)]
pub struct RestrictArgs {
    /// Path to the history dataset file
    pub history_file: PathBuf,

    /// Path to the future dataset file (may be missing)
    pub future_file: PathBuf,

    /// Output name: files are written as <name>_history.csv / <name>_future.csv
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Seed for user and product sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Keep this many randomly chosen users
    #[arg(long)]
    pub sample_users: Option<usize>,

    /// Minimum distinct baskets per user
    #[arg(long)]
    pub min_baskets: Option<usize>,

    /// Maximum distinct baskets per user
    #[arg(long)]
    pub max_baskets: Option<usize>,

    /// Minimum items per basket
    #[arg(long)]
    pub min_items: Option<usize>,

    /// Maximum items per basket
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Minimum records (purchases) per user
    #[arg(long)]
    pub min_records: Option<usize>,

    /// Maximum records (purchases) per user
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Keep only baskets made entirely of this many randomly chosen products
    #[arg(long)]
    pub products: Option<usize>,

    /// Keep only this many most recent basket periods
    #[arg(long)]
    pub periods: Option<usize>,

    /// Fewest users with 2+ baskets required to split
    #[arg(long, default_value_t = 1)]
    pub min_users: usize,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

fn range_step(
    min:  Option<usize>,
    max:  Option<usize>,
    make: fn(usize, usize) -> Step,
) -> Option<Step> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(make(min.unwrap_or(1), max.unwrap_or(usize::MAX)))
}

/// Convert CLI RestrictArgs into the application-layer RestrictPlan.
/// The application layer never sees clap types.
impl From<RestrictArgs> for RestrictPlan {
    fn from(a: RestrictArgs) -> Self {
        let steps = [
            a.sample_users.map(|n| Step::SampleUsers { n }),
            range_step(a.min_baskets, a.max_baskets, |min, max| Step::BasketCount { min, max }),
            range_step(a.min_items, a.max_items, |min, max| Step::BasketDepth { min, max }),
            range_step(a.min_records, a.max_records, |min, max| Step::RecordCount { min, max }),
            a.products.map(|n| Step::Assortment { n }),
            a.periods.map(|n| Step::TemporalDepth { n }),
        ]
        .into_iter()
        .flatten()
        .collect();

        RestrictPlan {
            history_file: a.history_file,
            future_file:  a.future_file,
            output_dir:   a.output_dir,
            name:         a.name,
            columns:      a.columns.spec(),
            delimiter:    a.columns.delimiter,
            seed:         a.seed,
            min_users:    a.min_users,
            steps,
        }
    }
}

#[derive(Args, Debug)]
pub struct InteractiveArgs {
    /// Path to the history dataset file
    pub history_file: PathBuf,

    /// Path to the future dataset file (may be missing)
    pub future_file: PathBuf,

    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Seed for user and product sampling
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Fewest users with 2+ baskets required to split
    #[arg(long, default_value_t = 1)]
    pub min_users: usize,

    #[command(flatten)]
    pub columns: ColumnArgs,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn restrict(args: &[&str]) -> RestrictPlan {
        let cli = Cli::try_parse_from(
            ["nbr-restrictor", "restrict", "h.csv", "f.csv", "--name", "out"]
                .iter()
                .chain(args),
        )
        .unwrap();
        match cli.command {
            Commands::Restrict(a) => a.into(),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_no_filter_flags_no_steps() {
        let plan = restrict(&[]);
        assert!(plan.steps.is_empty());
        assert_eq!(plan.columns, ColumnSpec::default());
        assert_eq!(plan.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_steps_use_fixed_order() {
        let plan = restrict(&["--periods", "4", "--min-items", "2", "--sample-users", "10"]);
        assert_eq!(
            plan.steps,
            vec![
                Step::SampleUsers { n: 10 },
                Step::BasketDepth { min: 2, max: usize::MAX },
                Step::TemporalDepth { n: 4 },
            ]
        );
    }

    #[test]
    fn test_custom_columns_and_tab_delimiter() {
        let plan = restrict(&["--basket-col", "basket_id", "--delimiter", "tab"]);
        assert_eq!(plan.columns.basket, "basket_id");
        assert_eq!(plan.delimiter, b'\t');
    }

    #[test]
    fn test_rejects_multi_char_delimiter() {
        assert!(parse_delimiter(";;").is_err());
        assert_eq!(parse_delimiter(";"), Ok(b';'));
    }
}
