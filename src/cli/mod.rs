// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, prompts with inquire, prints with println!. All data
// work is delegated to Layer 2 (application).
//
// Two front ends share one RestrictionSession:
//   1. `restrict`    — flags in, files out, no prompts
//   2. `interactive` — the same operations from a menu
// plus the profile workflow (`analyze`, `configure`, `apply`).

pub mod commands;
pub mod menu;
pub mod report;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{AnalyzeArgs, ApplyArgs, Commands, ConfigureArgs, InteractiveArgs, RestrictArgs};

use crate::application::profile_use_case::{analyze_named, discover_datasets, RestrictionProfile};
use crate::application::restrict_use_case::{RestrictPlan, RestrictUseCase};
use crate::application::session::RestrictionSession;
use crate::data::loader::CsvLoader;
use crate::infra::config_store::ProfileStore;

#[derive(Parser, Debug)]
#[command(
    name = "nbr-restrictor",
    version,
    about = "Apply data limitations to Next Basket Prediction datasets and split them into history/future."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching handler. Handlers only route and print.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Analyze(args)     => run_analyze(args),
            Commands::Configure(args)   => run_configure(args),
            Commands::Apply(args)       => run_apply(args),
            Commands::Restrict(args)    => run_restrict(args),
            Commands::Interactive(args) => run_interactive(args),
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let names = match args.dataset {
        Some(name) => vec![name],
        None       => discover_datasets(&args.input_dir)?,
    };
    if names.is_empty() {
        bail!(
            "No datasets found in '{}' (expected files: *_history.csv)",
            args.input_dir.display()
        );
    }

    let cols = args.columns.spec();
    for name in names {
        let analysis = analyze_named(&args.input_dir, &name, &cols, args.columns.delimiter)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            report::print_analysis(&name, &analysis);
        }
    }
    Ok(())
}

fn run_configure(args: ConfigureArgs) -> Result<()> {
    let dataset = match args.dataset {
        Some(name) => name,
        None => {
            let available = discover_datasets(&args.input_dir)?;
            if available.is_empty() {
                bail!(
                    "No datasets found in '{}' (expected files: *_history.csv)",
                    args.input_dir.display()
                );
            }
            println!("Available datasets: {}", available.join(", "));
            menu::prompt_dataset(available)?
        }
    };

    let analysis = analyze_named(&args.input_dir, &dataset, &args.columns.spec(), args.columns.delimiter)?;
    report::print_analysis(&dataset, &analysis);
    if analysis.total_transactions == 0 {
        bail!("Dataset '{}' has no records to restrict", dataset);
    }

    let restrictions = menu::prompt_restrictions(&dataset, &analysis)?;
    let profile      = RestrictionProfile::new(dataset, analysis, restrictions)?;
    let path         = ProfileStore::new(&args.output_dir).save(&profile)?;

    println!("\nConfiguration saved to: {}", path.display());
    report::print_profile_summary(&profile);
    Ok(())
}

fn run_apply(args: ApplyArgs) -> Result<()> {
    let profile = ProfileStore::load(&args.config)?;
    report::print_profile_summary(&profile);

    let plan = profile.to_plan(
        &args.input_dir,
        &args.output_dir,
        args.name,
        args.columns.spec(),
        args.columns.delimiter,
        args.seed,
    );
    execute_plan(plan)
}

fn run_restrict(args: RestrictArgs) -> Result<()> {
    tracing::info!(
        "Merging '{}' and '{}'",
        args.history_file.display(),
        args.future_file.display()
    );
    execute_plan(args.into())
}

fn execute_plan(plan: RestrictPlan) -> Result<()> {
    let summary = RestrictUseCase::new(plan).execute()?;

    for step in &summary.steps {
        report::print_step(step);
    }
    let paths = summary.history_path.zip(summary.future_path);
    report::print_split(&summary.split, paths.as_ref());
    Ok(())
}

fn run_interactive(args: InteractiveArgs) -> Result<()> {
    let delimiter = args.columns.delimiter;
    let history   = CsvLoader::new(&args.history_file).with_delimiter(delimiter);
    let future    = CsvLoader::new(&args.future_file).with_delimiter(delimiter).optional();

    println!(
        "Merging {} and {}...",
        args.history_file.display(),
        args.future_file.display()
    );
    let session = RestrictionSession::load(&history, &future, args.columns.spec(), args.seed)?;
    let stats   = session.stats()?;
    println!(
        "Loaded dataset with {} records and {} unique users",
        stats.records, stats.users
    );

    menu::run_menu(
        session,
        menu::MenuOptions {
            output_dir: &args.output_dir,
            delimiter,
            min_users:  args.min_users,
        },
    )
}
