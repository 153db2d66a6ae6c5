use anyhow::Result;
use clap::Parser;
use nbr_restrictor::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nbr_restrictor=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
